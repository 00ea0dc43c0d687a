//! Tree pages: list, create form, tree view, delete confirmation and the
//! deleted-trees list.

use arbor_core::forest::Forest;
use arbor_core::tree::Tree;

use super::{error_box, escape, layout, post_button};
use crate::handlers::pages::TreeForm;
use crate::views::node::node_item;

fn tree_href(tree: &Tree) -> String {
    format!("/trees/{}", tree.id.unwrap_or_default())
}

fn description(tree: &Tree) -> String {
    match &tree.description {
        Some(text) => format!("<p>{}</p>", escape(text)),
        None => String::new(),
    }
}

/// `GET /`: active trees, newest first.
pub fn tree_list(trees: &[Tree]) -> String {
    if trees.is_empty() {
        return layout(
            "Trees",
            r#"<p class="muted">No trees yet.</p><p><a href="/trees/new">Create the first one</a></p>"#,
        );
    }

    let mut body = String::from("<table><thead><tr><th>Name</th><th>Description</th><th>Updated</th></tr></thead><tbody>");
    for tree in trees {
        body.push_str(&format!(
            r#"<tr><td><a href="{}">{}</a></td><td>{}</td><td>{}</td></tr>"#,
            tree_href(tree),
            escape(&tree.name),
            escape(tree.description.as_deref().unwrap_or("")),
            tree.updated_at.format("%Y-%m-%d %H:%M"),
        ));
    }
    body.push_str("</tbody></table>");
    layout("Trees", &body)
}

/// `GET /trees/new`, and the same form re-rendered after a rejected submit.
pub fn new_tree_form(form: &TreeForm, error: Option<&str>) -> String {
    let body = format!(
        r#"{}
<form method="post" action="/trees">
<p><label>Name<br><input name="name" value="{}" required maxlength="255"></label></p>
<p><label>Description<br><textarea name="description" maxlength="1000">{}</textarea></label></p>
<p><button type="submit">Create tree</button></p>
</form>"#,
        error_box(error),
        escape(&form.name),
        escape(&form.description),
    );
    layout("New tree", &body)
}

/// `GET /trees/{id}`: the nodes nested under their parents, with per-node
/// move, add-child and delete controls.
pub fn tree_page(tree: &Tree, forest: &Forest) -> String {
    let href = tree_href(tree);
    let mut body = description(tree);
    body.push_str(&format!(
        r#"<p><a href="{href}/nodes/new">Add root node</a> <a href="{href}/delete">Delete tree</a></p>"#
    ));

    if forest.dropped_count() > 0 {
        body.push_str(&format!(
            r#"<p class="error">{} node(s) reference a missing parent and are not shown.</p>"#,
            forest.dropped_count()
        ));
    }

    if forest.root_count() == 0 {
        body.push_str(r#"<p class="muted">This tree has no nodes.</p>"#);
        return layout(&tree.name, &body);
    }

    // Pre-order with depth: open a list when going down a level, close one
    // per level when coming back up.
    body.push_str(r#"<ul class="tree">"#);
    let mut previous: Option<usize> = None;
    for (depth, node) in forest.preorder() {
        match previous {
            None => {}
            Some(prev) if depth > prev => body.push_str("<ul>"),
            Some(prev) => {
                body.push_str("</li>");
                for _ in depth..prev {
                    body.push_str("</ul></li>");
                }
            }
        }
        body.push_str("<li>");
        body.push_str(&node_item(&href, node.node()));
        previous = Some(depth);
    }
    if let Some(prev) = previous {
        body.push_str("</li>");
        for _ in 0..prev {
            body.push_str("</ul></li>");
        }
    }
    body.push_str("</ul>");

    let stats = forest.stats();
    body.push_str(&format!(
        r#"<p class="muted">{} node(s), {} root(s), depth {}</p>"#,
        stats.node_count, stats.root_count, stats.max_depth
    ));

    layout(&tree.name, &body)
}

/// `GET /trees/{id}/delete`.
pub fn delete_tree_confirm(tree: &Tree, node_count: usize) -> String {
    let href = tree_href(tree);
    let body = format!(
        r#"<p>Delete the tree <strong>{}</strong> with its {node_count} node(s)? It can be restored from the deleted-trees list.</p>
<p>{} <a href="{href}">Cancel</a></p>"#,
        escape(&tree.name),
        post_button(&format!("{href}/delete"), "Delete tree"),
    );
    layout("Delete tree", &body)
}

/// `GET /trees/deleted`.
pub fn deleted_trees(trees: &[Tree]) -> String {
    if trees.is_empty() {
        return layout("Deleted trees", r#"<p class="muted">No deleted trees.</p>"#);
    }

    let mut body = String::from("<table><thead><tr><th>Name</th><th>Deleted</th><th></th></tr></thead><tbody>");
    for tree in trees {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&tree.name),
            tree.updated_at.format("%Y-%m-%d %H:%M"),
            post_button(&format!("{}/restore", tree_href(tree)), "Restore"),
        ));
    }
    body.push_str("</tbody></table>");
    layout("Deleted trees", &body)
}

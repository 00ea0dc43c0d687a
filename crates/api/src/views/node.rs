//! Node pages: the per-node line of the tree view, the create form and the
//! delete confirmation.

use arbor_core::node::{NodeVariant, TreeNode};
use arbor_core::service::node::DeletionPreview;
use arbor_core::tree::Tree;

use super::{error_box, escape, layout, post_button};
use crate::handlers::pages::NodeForm;

/// One node inside the tree view. `tree_href` is `/trees/{id}`.
pub fn node_item(tree_href: &str, node: &TreeNode) -> String {
    let node_href = format!("{tree_href}/nodes/{}", node.id.unwrap_or_default());
    let kind = match &node.variant {
        NodeVariant::Simple => String::new(),
        NodeVariant::Button {
            button_text,
            button_action,
        } => format!(
            r#" <button type="button" disabled title="{}">{}</button>"#,
            escape(button_action.as_deref().unwrap_or("")),
            escape(button_text),
        ),
    };
    format!(
        r#"<strong>{}</strong>{kind} <span class="muted">#{}</span> {} {} <a href="{tree_href}/nodes/new?parent_id={}">Add child</a> <a href="{node_href}/delete">Delete</a>"#,
        escape(&node.name),
        node.sort_order,
        post_button(&format!("{node_href}/sort-left"), "Move left"),
        post_button(&format!("{node_href}/sort-right"), "Move right"),
        node.id.unwrap_or_default(),
    )
}

/// `GET /trees/{id}/nodes/new`, and the same form re-rendered after a
/// rejected submit.
pub fn new_node_form(
    tree: &Tree,
    parent: Option<&TreeNode>,
    form: &NodeForm,
    error: Option<&str>,
) -> String {
    let tree_href = format!("/trees/{}", tree.id.unwrap_or_default());
    let placement = match parent {
        Some(parent) => format!("Child of <strong>{}</strong>", escape(&parent.name)),
        None => "Root node".to_string(),
    };
    let parent_id = parent
        .and_then(|p| p.id)
        .map(|id| id.to_string())
        .unwrap_or_default();
    let checked = |kind: &str| {
        let selected = if form.node_type.is_empty() {
            kind == "simple"
        } else {
            form.node_type == kind
        };
        if selected {
            " checked"
        } else {
            ""
        }
    };

    let body = format!(
        r#"<p>In <a href="{tree_href}">{}</a>. {placement}.</p>
{}
<form method="post" action="{tree_href}/nodes">
<input type="hidden" name="parent_id" value="{parent_id}">
<p><label>Name<br><input name="name" value="{}" required maxlength="255"></label></p>
<p><label>Sort order<br><input name="sort_order" value="{}" inputmode="numeric" placeholder="after the last sibling"></label></p>
<p>Type
<label><input type="radio" name="node_type" value="simple"{}> Simple</label>
<label><input type="radio" name="node_type" value="button"{}> Button</label></p>
<p><label>Button text<br><input name="button_text" value="{}" maxlength="100"></label></p>
<p><label>Button action<br><input name="button_action" value="{}" maxlength="255"></label></p>
<p><button type="submit">Create node</button> <a href="{tree_href}">Cancel</a></p>
</form>"#,
        escape(&tree.name),
        error_box(error),
        escape(&form.name),
        escape(&form.sort_order),
        checked("simple"),
        checked("button"),
        escape(&form.button_text),
        escape(&form.button_action),
    );
    layout("New node", &body)
}

/// `GET /trees/{id}/nodes/{node_id}/delete`: lists everything the delete
/// would remove.
pub fn delete_node_confirm(tree: &Tree, preview: &DeletionPreview) -> String {
    let tree_href = format!("/trees/{}", tree.id.unwrap_or_default());
    let node_href = format!(
        "{tree_href}/nodes/{}",
        preview.node.id.unwrap_or_default()
    );

    let mut body = format!(
        "<p>Delete <strong>{}</strong> from <strong>{}</strong>? This removes {} node(s) and cannot be undone.</p>",
        escape(&preview.node.name),
        escape(&tree.name),
        preview.total(),
    );
    if preview.descendants.is_empty() {
        body.push_str(r#"<p class="muted">The node has no descendants.</p>"#);
    } else {
        body.push_str("<p>Descendants that will also be deleted:</p><ul>");
        for descendant in &preview.descendants {
            body.push_str(&format!("<li>{}</li>", escape(&descendant.name)));
        }
        body.push_str("</ul>");
    }
    body.push_str(&format!(
        r#"<p>{} <a href="{tree_href}">Cancel</a></p>"#,
        post_button(&format!("{node_href}/delete"), "Delete node"),
    ));
    layout("Delete node", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Tree {
        let mut tree = Tree::new("Menu", None);
        tree.id = Some(3);
        tree
    }

    fn node(id: i64, name: &str) -> TreeNode {
        let mut node = TreeNode::simple(3, None, name, 0);
        node.id = Some(id);
        node
    }

    #[test]
    fn node_item_has_move_and_delete_controls() {
        let html = node_item("/trees/3", &node(5, "Home"));
        assert!(html.contains(r#"action="/trees/3/nodes/5/sort-left""#));
        assert!(html.contains(r#"action="/trees/3/nodes/5/sort-right""#));
        assert!(html.contains(r#"href="/trees/3/nodes/5/delete""#));
        assert!(html.contains(r#"href="/trees/3/nodes/new?parent_id=5""#));
    }

    #[test]
    fn button_node_shows_its_button() {
        let mut button = node(6, "Buy");
        button.variant = NodeVariant::Button {
            button_text: "Pay <now>".into(),
            button_action: Some("/pay".into()),
        };
        let html = node_item("/trees/3", &button);
        assert!(html.contains("Pay &lt;now&gt;"));
        assert!(html.contains(r#"title="/pay""#));
    }

    #[test]
    fn node_form_under_parent_carries_parent_id() {
        let page = new_node_form(&tree(), Some(&node(5, "Home")), &NodeForm::default(), None);
        assert!(page.contains(r#"name="parent_id" value="5""#));
        assert!(page.contains("Child of <strong>Home</strong>"));
        assert!(page.contains(r#"value="simple" checked"#));
    }

    #[test]
    fn node_form_remembers_button_choice() {
        let form = NodeForm {
            node_type: "button".into(),
            ..NodeForm::default()
        };
        let page = new_node_form(&tree(), None, &form, Some("Button text is required"));
        assert!(page.contains(r#"value="button" checked"#));
        assert!(!page.contains(r#"value="simple" checked"#));
        assert!(page.contains("Button text is required"));
    }

    #[test]
    fn delete_confirmation_lists_descendants() {
        let preview = DeletionPreview {
            node: node(5, "Home"),
            descendants: vec![node(6, "About"), node(7, "Team")],
        };
        let page = delete_node_confirm(&tree(), &preview);
        assert!(page.contains("removes 3 node(s)"));
        assert!(page.contains("<li>About</li>"));
        assert!(page.contains("<li>Team</li>"));
        assert!(page.contains(r#"action="/trees/3/nodes/5/delete""#));
    }
}

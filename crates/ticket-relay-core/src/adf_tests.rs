//! Tests for ADF plain-text extraction.

use super::*;
use serde_json::json;

#[test]
fn test_null_and_missing_shapes_extract_to_empty() {
    assert_eq!(to_plain_text(&json!(null)), "");
    assert_eq!(to_plain_text(&json!({})), "");
    assert_eq!(to_plain_text(&json!({ "type": "unknown" })), "");
    assert_eq!(to_plain_text(&json!([1, 2, 3])), "");
}

#[test]
fn test_plain_string_is_trimmed() {
    assert_eq!(to_plain_text(&json!("  do the thing \n")), "do the thing");
    assert_eq!(to_plain_text(&json!("   ")), "");
}

#[test]
fn test_scalars_render_as_text() {
    assert_eq!(to_plain_text(&json!(42)), "42");
    assert_eq!(to_plain_text(&json!(true)), "true");
}

#[test]
fn test_doc_with_paragraphs() {
    let doc = json!({
        "type": "doc",
        "content": [
            { "type": "paragraph", "content": [
                { "type": "text", "text": "First line" }
            ] },
            { "type": "paragraph", "content": [
                { "type": "text", "text": "Second " },
                { "type": "text", "text": "line" }
            ] }
        ]
    });

    assert_eq!(to_plain_text(&doc), "First line\nSecond line");
}

#[test]
fn test_heading_formats_like_paragraph() {
    let doc = json!({
        "type": "doc",
        "content": [
            { "type": "heading", "attrs": { "level": 2 }, "content": [
                { "type": "text", "text": "  Goals  " }
            ] },
            { "type": "paragraph", "content": [
                { "type": "text", "text": "Ship it" }
            ] }
        ]
    });

    assert_eq!(to_plain_text(&doc), "Goals\nShip it");
}

#[test]
fn test_list_items_get_bullet_prefix() {
    let doc = json!({
        "type": "doc",
        "content": [
            { "type": "bulletList", "content": [
                { "type": "listItem", "content": [
                    { "type": "paragraph", "content": [
                        { "type": "text", "text": "one" }
                    ] }
                ] },
                { "type": "listItem", "content": [
                    { "type": "paragraph", "content": [
                        { "type": "text", "text": "two" }
                    ] }
                ] }
            ] }
        ]
    });

    assert_eq!(to_plain_text(&doc), "- one\n- two");
}

#[test]
fn test_unknown_containers_pass_children_through() {
    // blockquote is not special-cased; its children concatenate unchanged.
    let doc = json!({
        "type": "doc",
        "content": [
            { "type": "blockquote", "content": [
                { "type": "paragraph", "content": [
                    { "type": "text", "text": "quoted" }
                ] }
            ] }
        ]
    });

    assert_eq!(to_plain_text(&doc), "quoted");
}

#[test]
fn test_text_node_without_text_value() {
    let doc = json!({
        "type": "doc",
        "content": [
            { "type": "paragraph", "content": [
                { "type": "text" },
                { "type": "text", "text": "kept" }
            ] }
        ]
    });

    assert_eq!(to_plain_text(&doc), "kept");
}

#[test]
fn test_non_doc_object_extracts_to_empty() {
    // A paragraph at the top level is not a document.
    let not_a_doc = json!({
        "type": "paragraph",
        "content": [ { "type": "text", "text": "orphan" } ]
    });

    assert_eq!(to_plain_text(&not_a_doc), "");
}

#[test]
fn test_deeply_nested_document_does_not_panic() {
    let mut node = json!({ "type": "text", "text": "leaf" });
    for _ in 0..200 {
        node = json!({ "type": "bulletList", "content": [node] });
    }
    let doc = json!({ "type": "doc", "content": [node] });

    assert_eq!(to_plain_text(&doc), "leaf");
}

#[test]
fn test_output_is_bounded_by_input() {
    let doc = json!({
        "type": "doc",
        "content": [
            { "type": "paragraph", "content": [
                { "type": "text", "text": "abc" },
                { "type": "text", "text": "def" }
            ] }
        ]
    });

    let extracted = to_plain_text(&doc);
    assert!(extracted.len() <= doc.to_string().len());
}

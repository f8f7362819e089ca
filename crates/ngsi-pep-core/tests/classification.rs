//! End-to-end classification scenarios for NGSI requests.

use ngsi_pep_core::{
    classify, extract_action, inspect::XmlActionScanner, translate_action, Action, ActionRequest,
    ErrorKind,
};
use serde_json::json;

const XML_APPEND: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<updateContextRequest>
  <contextElementList>
    <contextElement>
      <entityId type="Room" isPattern="false">
        <id>Room1</id>
      </entityId>
      <contextAttributeList>
        <contextAttribute>
          <name>temperature</name>
          <type>float</type>
          <contextValue>23</contextValue>
        </contextAttribute>
      </contextAttributeList>
    </contextElement>
  </contextElementList>
  <updateAction>APPEND</updateAction>
</updateContextRequest>"#;

fn xml_update(body: &str) -> ActionRequest {
    ActionRequest::builder("/NGSI10/updateContext")
        .header("content-type", "application/xml")
        .body(body.to_string())
        .build()
}

#[test]
fn translator_covers_every_casing_of_known_tokens() {
    for (token, expected) in [
        ("APPEND", Action::Create),
        ("Append", Action::Create),
        ("append", Action::Create),
        ("UPDATE", Action::Update),
        ("Update", Action::Update),
        ("DELETE", Action::Delete),
        ("dElEtE", Action::Delete),
    ] {
        assert_eq!(translate_action(token), Some(expected), "token {token}");
    }
    assert_eq!(translate_action("APPEND_STRICT"), None);
}

#[test]
fn xml_update_context_request_is_create() {
    let mut request = xml_update(XML_APPEND);
    assert_eq!(classify(&mut request).unwrap(), Some(Action::Create));
    assert_eq!(request.action(), Some(Action::Create));
}

#[test]
fn xml_chunked_text_is_concatenated() {
    let mut scanner = XmlActionScanner::new();
    scanner.on_open_tag("updateContextRequest");
    scanner.on_open_tag("updateAction");
    scanner.on_text("AP");
    scanner.on_text("PEND");
    assert_eq!(scanner.finish().unwrap(), Some(Action::Create));
}

#[test]
fn xml_without_action_is_malformed() {
    let body = XML_APPEND.replace("<updateAction>APPEND</updateAction>", "");
    let mut request = xml_update(&body);
    let err = classify(&mut request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedXml);
    assert_eq!(request.action(), None);

    let blank = XML_APPEND.replace("APPEND", "   ");
    let mut request = xml_update(&blank);
    assert_eq!(classify(&mut request).unwrap_err().kind(), ErrorKind::MalformedXml);
}

#[test]
fn truncated_xml_is_malformed_with_diagnostic() {
    let truncated = &XML_APPEND[..XML_APPEND.len() - 10];
    let mut request = xml_update(truncated);
    let err = classify(&mut request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedXml);
    assert!(err.diagnostic().is_some());
}

#[test]
fn json_update_context_request() {
    let mut request = ActionRequest::builder("/ngsi10/updateContext")
        .header("content-type", "application/json")
        .json_body(json!({"updateAction": "delete"}))
        .build();
    assert_eq!(classify(&mut request).unwrap(), Some(Action::Delete));

    let mut empty = ActionRequest::builder("/ngsi10/updateContext")
        .header("content-type", "application/json")
        .json_body(json!({}))
        .build();
    assert_eq!(classify(&mut empty).unwrap_err().kind(), ErrorKind::MalformedJson);
}

#[test]
fn query_context_is_read_in_any_casing_without_body_inspection() {
    for path in ["/ngsi10/querycontext", "/NGSI10/QUERYCONTEXT", "/ngsi10/queryContext"] {
        // A body that would fail both inspectors proves it is never looked at.
        let mut request = ActionRequest::builder(path)
            .header("content-type", "application/xml")
            .body("<not-closed>")
            .build();
        assert_eq!(classify(&mut request).unwrap(), Some(Action::Read), "path {path}");
    }
}

#[test]
fn unknown_path_is_route_not_found() {
    let done = extract_action(ActionRequest::builder("/foo/bar").build(), ());
    assert_eq!(done.error.map(|e| e.kind()), Some(ErrorKind::RouteNotFound));
}

#[test]
fn update_context_with_json_never_consults_url_table() {
    // Path also contains a URL-table signature; the body still decides.
    let mut request = ActionRequest::builder("/ngsi10/updateContext/ngsi10/queryContext")
        .header("content-type", "application/json")
        .json_body(json!({"updateAction": "APPEND"}))
        .build();
    assert_eq!(classify(&mut request).unwrap(), Some(Action::Create));
}

#[test]
fn requests_classify_independently_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let token = ["APPEND", "UPDATE", "DELETE"][i % 3];
                let mut request =
                    xml_update(&format!("<r><updateAction>{token}</updateAction></r>"));
                classify(&mut request).unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, action) in results.into_iter().enumerate() {
        let expected = [Action::Create, Action::Update, Action::Delete][i % 3];
        assert_eq!(action, Some(expected));
    }
}

//! Registry uniqueness, lookup, hook and all-or-nothing rebuild tests.

use std::fs;
use std::sync::Arc;
use std::thread;

use folio_core::{BufferSink, Pages, PagesError, RequestContext, Status};
use folio_renderer::BaseDefinitions;
use rstest::rstest;
use serde_json::{json, Value};
use tempfile::TempDir;

const LAYOUT: &str = "<main>{% block body %}{% endblock %}</main>";
const CHILD: &str = r#"{% extends "base.html" %}{% block body %}{{ text }}{% endblock %}"#;

fn render(pages: &Pages, name: &str, data: &Value) -> Result<String, PagesError> {
    let mut sink = BufferSink::new();
    pages.execute(&mut sink, &RequestContext::default(), name, data)?;
    Ok(sink.body_string())
}

// ---------------------------------------------------------------------------
// 1. Uniqueness
// ---------------------------------------------------------------------------

#[rstest]
#[case::source_then_source(false, false)]
#[case::source_then_file(false, true)]
#[case::file_then_source(true, false)]
#[case::file_then_file(true, true)]
fn second_registration_under_same_name_fails(#[case] first_file: bool, #[case] second_file: bool) {
    let dir = TempDir::new().expect("tempdir");
    let first = dir.path().join("first.html");
    let second = dir.path().join("second.html");
    fs::write(&first, "first").expect("write");
    fs::write(&second, "second").expect("write");

    let pages = Pages::from_source(LAYOUT).expect("base");
    if first_file {
        pages.register_file("page", &first).expect("first");
    } else {
        pages.register_source("page", "first").expect("first");
    }

    let err = if second_file {
        pages.register_file("page", &second).unwrap_err()
    } else {
        pages.register_source("page", "second").unwrap_err()
    };
    assert!(matches!(err, PagesError::DuplicateName { .. }), "got: {err}");
    assert!(err.to_string().contains("already exists"));
    assert_eq!(render(&pages, "page", &Value::Null).unwrap(), "first");
}

// ---------------------------------------------------------------------------
// 2. Lookup
// ---------------------------------------------------------------------------

#[test]
fn echo_page_renders_data() {
    let pages = Pages::from_source(LAYOUT).expect("base");
    pages.register_source("echo", "{{ data }}").expect("register");
    assert_eq!(render(&pages, "echo", &json!("x")).unwrap(), "x");
}

#[test]
fn unknown_name_is_reported_and_writes_nothing() {
    let pages = Pages::from_source(LAYOUT).expect("base");
    let mut sink = BufferSink::new();
    let err = pages
        .execute(&mut sink, &RequestContext::default(), "nope", &json!("x"))
        .unwrap_err();
    assert!(matches!(err, PagesError::UnknownTemplate { ref name } if name == "nope"));
    assert!(sink.body().is_empty());
    assert_eq!(sink.status(), None);
}

#[test]
fn execution_error_writes_nothing() {
    let pages = Pages::from_source(LAYOUT).expect("base");
    pages.register_source("strict", "before {{ missing }}").expect("register");
    let mut sink = BufferSink::new();
    let err = pages
        .execute(&mut sink, &RequestContext::default(), "strict", &json!({}))
        .unwrap_err();
    assert!(matches!(err, PagesError::Render { .. }), "got: {err}");
    assert!(sink.body().is_empty(), "no partial output on render failure");
}

#[test]
fn pages_extend_the_base_layout() {
    let pages = Pages::from_source(LAYOUT).expect("base");
    pages.register_source("home", CHILD).expect("register");
    assert_eq!(
        render(&pages, "home", &json!({ "text": "hello" })).unwrap(),
        "<main>hello</main>"
    );
}

// ---------------------------------------------------------------------------
// 3. Hook
// ---------------------------------------------------------------------------

#[test]
fn identity_hook_matches_direct_render() {
    let pages = Pages::from_source(LAYOUT).expect("base");
    pages.register_source("home", CHILD).expect("register");
    let data = json!({ "text": "<b>same</b>" });

    let direct = BaseDefinitions::parse(LAYOUT)
        .unwrap()
        .compile(CHILD)
        .unwrap()
        .render(&data)
        .unwrap();
    assert_eq!(render(&pages, "home", &data).unwrap(), direct);
}

#[test]
fn hook_enriches_data_from_request() {
    let pages = Pages::from_source(LAYOUT).expect("base");
    pages
        .register_source("who", "{{ user }}@{{ path }}")
        .expect("register");
    pages.set_hook(|_sink, request, mut data| {
        data["path"] = Value::String(request.path.clone());
        data["user"] = Value::String(request.param("user").unwrap_or("anon").to_string());
        data
    });

    let mut sink = BufferSink::new();
    let request = RequestContext::new("inbox").with_param("user", "kim");
    pages
        .execute(&mut sink, &request, "who", &json!({}))
        .expect("execute");
    assert_eq!(sink.body_string(), "kim@inbox");
}

#[test]
fn hook_can_set_a_status() {
    let pages = Pages::from_source(LAYOUT).expect("base");
    pages.register_source("echo", "{{ data }}").expect("register");
    pages.set_hook(|sink, _request, data| {
        sink.send_status(Status::NotFound);
        data
    });
    let mut sink = BufferSink::new();
    pages
        .execute(&mut sink, &RequestContext::default(), "echo", &json!("gone"))
        .expect("execute");
    assert_eq!(sink.status(), Some(Status::NotFound));
    assert_eq!(sink.body_string(), "gone");
}

#[test]
fn hooks_are_scoped_to_their_registry() {
    let a = Pages::from_source(LAYOUT).expect("base");
    let b = Pages::from_source(LAYOUT).expect("base");
    a.register_source("echo", "{{ data }}").expect("register");
    b.register_source("echo", "{{ data }}").expect("register");
    a.set_hook(|_sink, _request, _data| json!("a"));

    assert_eq!(render(&a, "echo", &json!("x")).unwrap(), "a");
    assert_eq!(render(&b, "echo", &json!("x")).unwrap(), "x");
}

// ---------------------------------------------------------------------------
// 4. Rebuild
// ---------------------------------------------------------------------------

#[test]
fn rebuild_picks_up_changed_files() {
    let dir = TempDir::new().expect("tempdir");
    let layout = dir.path().join("layout.html");
    let page = dir.path().join("page.html");
    fs::write(&layout, LAYOUT).expect("write");
    fs::write(&page, CHILD).expect("write");

    let pages = Pages::from_file(&layout).expect("base");
    pages.register_file("page", &page).expect("register");
    assert_eq!(render(&pages, "page", &json!({ "text": "t" })).unwrap(), "<main>t</main>");

    fs::write(&layout, "<div>{% block body %}{% endblock %}</div>").expect("write");
    fs::write(
        &page,
        r#"{% extends "base.html" %}{% block body %}[{{ text }}]{% endblock %}"#,
    )
    .expect("write");
    pages.rebuild().expect("rebuild");

    assert_eq!(render(&pages, "page", &json!({ "text": "t" })).unwrap(), "<div>[t]</div>");
}

#[test]
fn failed_rebuild_keeps_previous_generation() {
    let dir = TempDir::new().expect("tempdir");
    let layout = dir.path().join("layout.html");
    let page = dir.path().join("page.html");
    fs::write(&layout, LAYOUT).expect("write");
    fs::write(&page, CHILD).expect("write");

    let pages = Pages::from_file(&layout).expect("base");
    pages.register_file("page", &page).expect("register");
    pages.register_source("inline", CHILD).expect("register");
    let data = json!({ "text": "t" });
    let before_page = render(&pages, "page", &data).unwrap();
    let before_inline = render(&pages, "inline", &data).unwrap();

    // New base would change every page, but the file-backed page is gone.
    fs::write(&layout, "<div>{% block body %}{% endblock %}</div>").expect("write");
    fs::remove_file(&page).expect("remove");
    let err = pages.rebuild().unwrap_err();
    assert!(matches!(err, PagesError::Load { .. }), "got: {err}");

    assert_eq!(render(&pages, "page", &data).unwrap(), before_page);
    assert_eq!(render(&pages, "inline", &data).unwrap(), before_inline);
    assert_eq!(pages.names(), vec!["inline".to_string(), "page".to_string()]);
}

#[test]
fn failed_base_parse_aborts_rebuild() {
    let dir = TempDir::new().expect("tempdir");
    let layout = dir.path().join("layout.html");
    fs::write(&layout, LAYOUT).expect("write");
    let pages = Pages::from_file(&layout).expect("base");
    pages.register_source("home", CHILD).expect("register");

    fs::write(&layout, "{% block body %}").expect("write");
    let err = pages.rebuild().unwrap_err();
    assert!(matches!(err, PagesError::Parse { .. }), "got: {err}");
    assert_eq!(
        render(&pages, "home", &json!({ "text": "ok" })).unwrap(),
        "<main>ok</main>"
    );
}

#[test]
fn string_base_rebuild_keeps_source_pages_behaviour() {
    let pages = Pages::from_source(LAYOUT).expect("base");
    pages.register_source("home", CHILD).expect("register");
    let data = json!({ "text": "same" });
    let before = render(&pages, "home", &data).unwrap();

    pages.rebuild().expect("rebuild");

    assert_eq!(render(&pages, "home", &data).unwrap(), before);
}

#[test]
fn string_base_rebuild_rereads_file_pages() {
    let dir = TempDir::new().expect("tempdir");
    let page = dir.path().join("page.html");
    fs::write(&page, "one").expect("write");
    let pages = Pages::from_source(LAYOUT).expect("base");
    pages.register_file("page", &page).expect("register");

    fs::write(&page, "two").expect("write");
    assert_eq!(render(&pages, "page", &Value::Null).unwrap(), "one");
    pages.rebuild().expect("rebuild");
    assert_eq!(render(&pages, "page", &Value::Null).unwrap(), "two");
}

// ---------------------------------------------------------------------------
// 5. Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_rebuilds_and_renders_stay_consistent() {
    let dir = TempDir::new().expect("tempdir");
    let layout = dir.path().join("layout.html");
    fs::write(&layout, LAYOUT).expect("write");
    let pages = Pages::from_file(&layout).expect("base");
    pages.register_source("home", CHILD).expect("register");
    let pages = Arc::new(pages);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pages = Arc::clone(&pages);
            thread::spawn(move || {
                for _ in 0..25 {
                    if i == 0 {
                        pages.rebuild().expect("rebuild");
                    } else {
                        let out = render(&pages, "home", &json!({ "text": "x" })).expect("render");
                        assert_eq!(out, "<main>x</main>");
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread");
    }
}

#[test]
fn hook_swaps_during_renders_are_never_torn() {
    let pages = Pages::from_source(LAYOUT).expect("base");
    pages.register_source("echo", "{{ data }}").expect("register");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pages = pages.clone();
            thread::spawn(move || {
                for n in 0..50 {
                    if i == 0 {
                        if n % 2 == 0 {
                            pages.set_hook(|_sink, _request, _data| json!("hooked"));
                        } else {
                            pages.reset_hook();
                        }
                    } else {
                        let out = render(&pages, "echo", &json!("plain")).expect("render");
                        assert!(out == "plain" || out == "hooked", "unexpected output: {out}");
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread");
    }
}

//! End-to-end tests against a running server.

use std::time::Duration;

use devserver::lifecycle::prepare;

mod common;

use common::{client, start, Workspace};

fn positions(body: &str, needles: &[&str]) -> Vec<usize> {
    needles
        .iter()
        .map(|n| body.find(n).unwrap_or_else(|| panic!("{n:?} missing from response")))
        .collect()
}

#[tokio::test]
async fn test_combined_script_load_order() {
    let ws = Workspace::new();
    ws.file("scripts.MF", "vendor/require.js\nvendor/polyfill.js\n")
        .file("vendor/require.js", "/* REQUIRE */")
        .file("vendor/polyfill.js", "/* POLYFILL */")
        .file("devtools/livereload.js", "/* LIVERELOAD */")
        .file("sources.MF", "app/a.js\napp/b.js\n")
        .file("app/a.js", "/* A */")
        .file("app/b.js", "/* B */");

    let prepared = prepare(
        &ws.cli(&["--livereload_script=devtools/livereload.js", "--entry_module=app/main"]),
        Some("https://live.example.com:9001/ignored"),
    )
    .unwrap();
    let server = start(prepared).await;

    let res = client().get(server.url("/_/ts_scripts.js")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    let body = res.text().await.unwrap();

    let order = positions(
        &body,
        &[
            "window.LiveReloadOptions = { https: \"https\" === \"https\", host: \"live.example.com\", port: 9001 };",
            "/* LIVERELOAD */",
            "/* REQUIRE */",
            "/* POLYFILL */",
            "/* A */",
            "/* B */",
            "require([\"app/main\"]);",
        ],
    );
    assert!(order.windows(2).all(|w| w[0] < w[1]), "out of order: {order:?}");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_missing_user_script_is_skipped() {
    let ws = Workspace::new();
    ws.file("scripts.MF", "one.js\ntwo.js\nthree.js\n")
        .file("one.js", "/* ONE */")
        .file("three.js", "/* THREE */")
        .file("sources.MF", "");

    let prepared = prepare(&ws.cli(&[]), None).unwrap();
    let server = start(prepared).await;

    let body = client()
        .get(server.url("/_/ts_scripts.js"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "/* ONE */\n/* THREE */\n");
    assert!(!body.contains("LiveReloadOptions"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_custom_serving_path() {
    let ws = Workspace::new();
    ws.file("scripts.MF", "").file("sources.MF", "main.js\n").file("main.js", "go()");

    let prepared = prepare(&ws.cli(&["--serving_path=/bundle.js"]), None).unwrap();
    let server = start(prepared).await;
    let client = client();

    let body = client.get(server.url("/bundle.js")).send().await.unwrap().text().await.unwrap();
    assert!(body.starts_with("eval('go()"));

    let index = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
    assert!(index.contains(r#"<script src="/bundle.js"></script>"#));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_package_files_and_index_fallback() {
    let ws = Workspace::new();
    ws.file("scripts.MF", "")
        .file("sources.MF", "")
        .file("app/index.html", "<html>app index</html>")
        .file("app/styles/site.css", "body { margin: 0 }")
        .file("shared/data.json", "{}");

    let prepared = prepare(&ws.cli(&[]), None).unwrap();
    let server = start(prepared).await;
    let client = client();

    let css = client.get(server.url("/styles/site.css")).send().await.unwrap();
    assert_eq!(css.status(), 200);
    assert_eq!(css.headers()["content-type"], "text/css");
    assert_eq!(css.text().await.unwrap(), "body { margin: 0 }");

    let json = client.get(server.url("/shared/data.json")).send().await.unwrap();
    assert_eq!(json.status(), 200);

    let route = client.get(server.url("/users/42")).send().await.unwrap();
    assert_eq!(route.status(), 200);
    assert_eq!(route.text().await.unwrap(), "<html>app index</html>");

    let missing = client.get(server.url("/nope.png")).send().await.unwrap();
    assert_eq!(missing.status(), 404);

    let manifest = client.get(server.url("/sources.MF")).send().await.unwrap();
    assert_eq!(manifest.status(), 404);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let ws = Workspace::new();
    ws.file("scripts.MF", "").file("sources.MF", "");

    let prepared = prepare(&ws.cli(&[]), None).unwrap();
    let server = start(prepared).await;
    let addr = server.addr;

    server.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());

    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}

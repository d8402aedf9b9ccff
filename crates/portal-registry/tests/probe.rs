//! Availability probing against local listeners.

use std::io::Write;
use std::time::Duration;

use portal_registry::{ModuleConfig, ModuleManifest, ModuleProbe, ModuleRegistry};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const HOST: &str = "http://localhost:3000";

fn module(id: &str, base_url: &str) -> ModuleConfig {
    ModuleConfig {
        id: id.to_string(),
        path: format!("/{id}"),
        label: id.to_string(),
        icon: "box".to_string(),
        base_url: base_url.to_string(),
    }
}

/// Serve every connection with a fixed status line.
async fn serve_status(status: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response =
                    format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_local_modules_skip_probe() {
    let probe = ModuleProbe::new(HOST).unwrap();
    assert!(probe.is_available(&module("oms", "")).await);
    assert!(probe.is_available(&module("core", HOST)).await);
}

#[tokio::test]
async fn test_closed_port_is_unavailable() {
    let probe = ModuleProbe::with_timeout(HOST, Duration::from_millis(500)).unwrap();
    assert!(!probe.is_available(&module("dashboard", "http://127.0.0.1:1")).await);
}

#[tokio::test]
async fn test_status_decides_availability() {
    let up = serve_status("200 OK").await;
    let missing = serve_status("404 Not Found").await;
    let probe = ModuleProbe::new(HOST).unwrap();

    assert!(probe.is_available(&module("dashboard", &up)).await);
    assert!(!probe.is_available(&module("reports", &missing)).await);
}

#[tokio::test]
async fn test_registry_keeps_manifest_order() {
    let up = serve_status("204 No Content").await;
    let manifest = ModuleManifest {
        modules: vec![
            module("dashboard", &up),
            module("reports", "http://127.0.0.1:1"),
            module("oms", ""),
        ],
    };
    let probe = ModuleProbe::with_timeout(HOST, Duration::from_millis(500)).unwrap();
    let registry = ModuleRegistry::load(manifest, &probe).await;

    let ids: Vec<_> = registry.modules().iter().map(|m| m.module.id.as_str()).collect();
    assert_eq!(ids, vec!["dashboard", "reports", "oms"]);

    let available: Vec<_> = registry
        .available()
        .into_iter()
        .map(|m| m.module.id.clone())
        .collect();
    assert_eq!(available, vec!["dashboard", "oms"]);
    assert!(!registry.find("reports").unwrap().available);
}

#[tokio::test]
async fn test_registry_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"modules":[{"id":"oms","path":"/oms","label":"Orders","icon":"cart","baseUrl":""}]}"#)
        .unwrap();

    let probe = ModuleProbe::new(HOST).unwrap();
    let registry = ModuleRegistry::from_file(file.path(), &probe).await.unwrap();
    assert_eq!(registry.available().len(), 1);
}

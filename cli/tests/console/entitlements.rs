//! Entitlement listings and certificate upload.

use anyhow::{Result, anyhow};
use rhuictl::application::ports::ArtifactProbe;
use rhuictl::application::services::entitlements::{
    list_custom_entitlements, list_entitlements, list_rh_entitlements, upload_rh_certificate,
};
use rhuictl::application::services::repo::add_custom_repo;
use rhuictl::domain::entitlement::DEFAULT_CERTIFICATE_PATH;
use rhuictl::domain::{ConsoleError, CustomRepo};

use crate::fake::{self, Certificate, World};

/// Probe over a fixed set of files.
struct Files(Vec<&'static str>);

impl ArtifactProbe for Files {
    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.0.iter().any(|known| *known == path))
    }
}

struct Unreachable;

impl ArtifactProbe for Unreachable {
    async fn exists(&self, _path: &str) -> Result<bool> {
        Err(anyhow!("ssh: connect to host rhua port 22: Connection refused"))
    }
}

fn world_with(certificate: Certificate) -> World {
    let mut world = World::new();
    world
        .certificates
        .push((DEFAULT_CERTIFICATE_PATH.to_string(), certificate));
    world
}

#[tokio::test]
async fn test_upload_valid_certificate_returns_granted_entitlements() {
    let (mut session, _world) = fake::ready(world_with(Certificate::Valid {
        product: "Red Hat Update Infrastructure 3 (RPMs)".to_string(),
        file: "5a7c.pem".to_string(),
    }))
    .await;
    let probe = Files(vec![DEFAULT_CERTIFICATE_PATH]);

    let granted = upload_rh_certificate(&mut session, &probe, DEFAULT_CERTIFICATE_PATH)
        .await
        .unwrap();
    assert_eq!(granted.len(), 1);
    assert_eq!(granted[0].name, "Red Hat Update Infrastructure 3 (RPMs)");
    assert!(granted[0].detail.ends_with("5a7c.pem"));

    let listed = list_rh_entitlements(&mut session).await.unwrap();
    assert_eq!(listed, granted);
}

#[tokio::test]
async fn test_upload_missing_certificate_sends_nothing() {
    let (mut session, world) = fake::ready(World::new()).await;
    let before = world.lock().unwrap().received.len();

    let err = upload_rh_certificate(&mut session, &Files(vec![]), "/tmp/missing.pem")
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::MissingArtifact(ref p) if p == "/tmp/missing.pem"));
    assert_eq!(world.lock().unwrap().received.len(), before);
}

#[tokio::test]
async fn test_upload_probe_failure_is_reported() {
    let (mut session, _world) = fake::ready(World::new()).await;

    let err = upload_rh_certificate(&mut session, &Unreachable, DEFAULT_CERTIFICATE_PATH)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ConsoleError::ProbeFailed { ref reason, .. } if reason.contains("Connection refused")),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_upload_expired_certificate_is_bad_certificate() {
    let (mut session, _world) = fake::ready(world_with(Certificate::Expired)).await;
    let probe = Files(vec![DEFAULT_CERTIFICATE_PATH]);

    let err = upload_rh_certificate(&mut session, &probe, DEFAULT_CERTIFICATE_PATH)
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::BadCertificate), "got: {err:?}");

    // Recovery left the console at the top level.
    assert!(list_rh_entitlements(&mut session).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_incompatible_certificate() {
    let (mut session, _world) = fake::ready(world_with(Certificate::Incompatible)).await;
    let probe = Files(vec![DEFAULT_CERTIFICATE_PATH]);

    let err = upload_rh_certificate(&mut session, &probe, DEFAULT_CERTIFICATE_PATH)
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::IncompatibleCertificate), "got: {err:?}");
}

#[tokio::test]
async fn test_custom_entitlements_are_sorted_names() {
    let (mut session, _world) = fake::ready(World::new()).await;
    for id in ["zeta", "alpha"] {
        add_custom_repo(&mut session, &CustomRepo::new(id)).await.unwrap();
    }
    let mut unentitled = CustomRepo::new("no-cert");
    unentitled.entitlement = false;
    add_custom_repo(&mut session, &unentitled).await.unwrap();

    let names = list_custom_entitlements(&mut session).await.unwrap();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[tokio::test]
async fn test_raw_listing_contains_both_sections() {
    let (mut session, _world) = fake::ready(World::new()).await;
    let text = list_entitlements(&mut session).await.unwrap();
    assert!(text.contains("Red Hat Entitlements"));
    assert!(text.contains("Custom Repository Entitlements"));
}

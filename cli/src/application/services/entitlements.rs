//! Application service: the entitlements manager screen.

use tracing::info;

use crate::application::navigator::{capture, expect_text, list_lines, with_screen};
use crate::application::ports::{ArtifactProbe, Console};
use crate::domain::ConsoleError;
use crate::domain::entitlement::{
    Entitlement, UploadVerdict, parse_custom_entitlements, parse_rh_entitlements, upload_verdict,
};
use crate::domain::screen::{Screen, keys};

const CUSTOM_KEY: &str = "c";
const UPLOAD_KEY: &str = "u";

/// Raw listing of the entitlements screen.
///
/// # Errors
///
/// Expectation failures; the console is back at the top-level prompt.
pub async fn list_entitlements<C: Console>(console: &mut C) -> Result<String, ConsoleError> {
    with_screen(console, Screen::Entitlements, |c| {
        Box::pin(async move { list_lines(c, &Screen::Entitlements.prompt()).await })
    })
    .await
}

/// Red Hat entitlements, in console order.
///
/// # Errors
///
/// Expectation failures; the console is back at the top-level prompt.
pub async fn list_rh_entitlements<C: Console>(
    console: &mut C,
) -> Result<Vec<Entitlement>, ConsoleError> {
    with_screen(console, Screen::Entitlements, |c| {
        Box::pin(async move {
            let text = list_lines(c, &Screen::Entitlements.prompt()).await?;
            Ok(parse_rh_entitlements(&text))
        })
    })
    .await
}

/// Names of the custom repository entitlements, sorted.
///
/// # Errors
///
/// Expectation failures; the console is back at the top-level prompt.
pub async fn list_custom_entitlements<C: Console>(
    console: &mut C,
) -> Result<Vec<String>, ConsoleError> {
    with_screen(console, Screen::Entitlements, |c| {
        Box::pin(async move {
            let text = capture(c, CUSTOM_KEY, &Screen::Entitlements.prompt()).await?;
            Ok(parse_custom_entitlements(&text))
        })
    })
    .await
}

/// Uploads a new or updated Red Hat content certificate and returns the
/// entitlements it grants.
///
/// The certificate must exist where the console runs; that is checked
/// through `probe` before a single key is sent.
///
/// # Errors
///
/// [`ConsoleError::MissingArtifact`] when the certificate is absent,
/// [`ConsoleError::BadCertificate`] / [`ConsoleError::IncompatibleCertificate`]
/// when the console rejects it.
pub async fn upload_rh_certificate<C: Console>(
    console: &mut C,
    probe: &impl ArtifactProbe,
    certificate: &str,
) -> Result<Vec<Entitlement>, ConsoleError> {
    let present = probe
        .exists(certificate)
        .await
        .map_err(|e| ConsoleError::ProbeFailed {
            path: certificate.to_string(),
            reason: format!("{e:#}"),
        })?;
    if !present {
        return Err(ConsoleError::MissingArtifact(certificate.to_string()));
    }

    let certificate = certificate.to_string();
    with_screen(console, Screen::Entitlements, move |c| {
        Box::pin(async move { upload(c, &certificate).await })
    })
    .await
}

async fn upload<C: Console>(console: &mut C, certificate: &str) -> Result<Vec<Entitlement>, ConsoleError> {
    let timeout = console.timeouts().default;
    console.send(UPLOAD_KEY).await?;
    expect_text(console, "Full path to the new content certificate:", timeout).await?;
    console.send(certificate).await?;
    expect_text(
        console,
        "The RHUI will be updated with the following certificate:",
        timeout,
    )
    .await?;
    let outcome = capture(console, keys::YES, &Screen::Entitlements.prompt()).await?;

    match upload_verdict(&outcome) {
        UploadVerdict::ExpiredOrInvalid => Err(ConsoleError::BadCertificate),
        UploadVerdict::Incompatible => Err(ConsoleError::IncompatibleCertificate),
        UploadVerdict::Accepted => {
            info!(certificate, "certificate uploaded");
            Ok(parse_rh_entitlements(&outcome))
        }
    }
}

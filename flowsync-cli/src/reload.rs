//! Reload notification for the runtime's admin HTTP API.
//!
//! One POST per collection pass, issued only after the document is already
//! persisted. Failures are reported to the caller — never retried, never
//! fatal.

use anyhow::{anyhow, Result};

/// Header telling the runtime to reload configuration in place instead of
/// performing a full redeploy.
pub const DEPLOYMENT_TYPE_HEADER: &str = "Node-RED-Deployment-Type";

/// POST a reload intent to `<server_at>/flows`.
///
/// The runtime acknowledges with `204 No Content`; anything else is an
/// error for the caller to log.
pub fn notify_reload(server_at: &str) -> Result<()> {
    let url = format!("{server_at}/flows");
    match ureq::post(&url)
        .set(DEPLOYMENT_TYPE_HEADER, "reload")
        .send_json(serde_json::json!({}))
    {
        Ok(response) if response.status() == 204 => Ok(()),
        Ok(response) => Err(anyhow!(
            "unexpected status {} from {url}",
            response.status()
        )),
        Err(ureq::Error::Status(code, _)) => {
            Err(anyhow!("runtime at {url} answered status {code}"))
        }
        Err(err) => Err(anyhow!("could not reach runtime at {url}: {err}")),
    }
}

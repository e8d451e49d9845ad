use std::path::Path;

use cfg_if::cfg_if;
use lustre::LoadError;
use lustre_mesh::Mesh;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    use anyhow::Context;

    let window = web_sys::window().context("not running in a browser window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page has no origin"))?;
    let url = reqwest::Url::parse(&format!("{}/", origin))?
        .join("res/")?
        .join(file_name)?;
    Ok(url)
}

/// Fetches `file_name` from the `res/` directory next to the page.
#[cfg(target_arch = "wasm32")]
pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let url = format_url(file_name)?;
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Reads and parses the model at `path`.
pub async fn load_model(path: &Path) -> Result<Mesh, LoadError> {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            let data = load_binary(&path.to_string_lossy())
                .await
                .map_err(|e| LoadError::Fetch(format!("{e:#}")))?;
            lustre::parse_model(&data)
        } else {
            lustre::read_model(path)
        }
    }
}

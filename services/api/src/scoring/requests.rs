use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    pub csv_data: Option<String>,
}

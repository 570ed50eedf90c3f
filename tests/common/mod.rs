//! Common test utilities: HTML fixtures shaped like Kleinanzeigen pages

#![allow(dead_code)]

use firechair::config::Config;
use std::path::Path;

/// Result page with the given pagination labels and anchors
pub fn result_page(pages: &[&str], hrefs: &[&str]) -> String {
    let pagination: String = pages
        .iter()
        .map(|label| format!(r#"<a class="pagination-page" href="/seite">{label}</a>"#))
        .collect();

    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li class="ad-listitem"><article><a href="{href}">Anzeige</a></article></li>"#
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Motorräder | kleinanzeigen.de</title></head>
<body>
  <a href="/s-motorraeder/k0c305">Kategorie</a>
  <ul id="srchrslt-adtable">{items}</ul>
  <div class="pagination">{pagination}</div>
</body>
</html>"#
    )
}

/// Detail page with optional price and mileage
pub fn detail_page(price: Option<&str>, mileage: Option<&str>) -> String {
    let price = price
        .map(|p| format!(r#"<h2 id="viewad-price" class="boxedarticle--price">{p}</h2>"#))
        .unwrap_or_default();

    let mileage = mileage
        .map(|m| {
            format!(
                r#"<li class="addetailslist--detail">Kilometerstand
                     <span class="addetailslist--detail--value">{m}</span></li>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <h1 id="viewad-title">Honda CBR 600F</h1>
  {price}
  <ul class="addetailslist">
    <li class="addetailslist--detail">Marke
      <span class="addetailslist--detail--value">Honda</span></li>
    {mileage}
  </ul>
</body>
</html>"#
    )
}

/// Configuration pointing at a mock server with files under `dir`
pub fn test_config(base_url: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = base_url.to_string();
    config.crawler.request_delay_ms = 1;
    config.crawler.request_timeout_secs = 5;
    config.storage.output_dir = dir.to_path_buf();
    config.storage.sqlite_path = dir.join("motorrad.db");
    config
}

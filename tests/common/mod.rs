//! Common test utilities

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wikiharvest::language::{Detection, LanguageDetector};
use wikiharvest::throttle::Pacer;
use wikiharvest::utils::error::LanguageError;

/// Build a MediaWiki-shaped article page
#[allow(dead_code)]
pub fn article_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html class="client-nojs" lang="en" dir="ltr">
<head>
    <meta charset="UTF-8">
    <title>{title} - Wikipedia</title>
</head>
<body class="mediawiki">
    <main id="content" class="mw-body">
        <header class="mw-body-header">
            <h1 id="firstHeading" class="firstHeading mw-first-heading"><span class="mw-page-title-main">{title}</span></h1>
        </header>
        <div id="bodyContent" class="vector-body">
            <div id="siteSub">From Wikipedia, the free encyclopedia</div>
            <div id="mw-content-text" class="mw-body-content">{body}</div>
        </div>
    </main>
</body>
</html>"#
    )
}

/// Detector that always answers with the same code
#[allow(dead_code)]
pub struct FixedDetector(pub &'static str);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Result<Detection, LanguageError> {
        Ok(Detection {
            code: self.0.to_string(),
            confidence: 1.0,
            reliable: true,
        })
    }
}

/// Pacer that never sleeps but counts how often it was asked to
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingPacer {
    pauses: AtomicUsize,
}

#[allow(dead_code)]
impl CountingPacer {
    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Pacer for CountingPacer {
    fn next_delay(&self) -> Duration {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        Duration::ZERO
    }
}

/// An English paragraph long enough for reliable detection
#[allow(dead_code)]
pub const ENGLISH_BODY: &str = "<p>The history of the town begins in the fifteenth century, \
when the first settlers built their houses on the banks of the river.[1] \
Over the following centuries it grew into an important market for the surrounding farms.[2]</p>";

/// A Spanish paragraph long enough for reliable detection
#[allow(dead_code)]
pub const SPANISH_BODY: &str = "<p>La historia de la ciudad comienza en el siglo XV, cuando \
los primeros habitantes construyeron sus casas a orillas del río.[1] Durante los siglos \
siguientes se convirtió en un mercado importante para las granjas de la región.[2]</p>";

use std::time::Duration;

use indicatif::ProgressBar;
use tracing::info;

use crate::db::Store;
use crate::error::Result;
use crate::extract::{CompletionService, ExtractedRecord, Extractor};
use crate::fetch::Fetcher;
use crate::normalize::normalize;

pub struct RunReport {
    pub url: String,
    pub extracted: Vec<ExtractedRecord>,
    pub inserted: usize,
}

/// fetch → normalize → extract → insert, one stage after another. Any error
/// stops the run before the store is written.
pub struct Pipeline<C> {
    fetcher: Fetcher,
    extractor: Extractor<C>,
    store: Store,
}

impl<C: CompletionService> Pipeline<C> {
    pub fn new(fetcher: Fetcher, extractor: Extractor<C>, store: Store) -> Self {
        Pipeline {
            fetcher,
            extractor,
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn run(&self, url: &str) -> Result<RunReport> {
        println!("Fetching web page content...");
        let html = self.fetcher.fetch(url).await?;

        println!("Parsing HTML to extract text...");
        let text = normalize(&html);
        info!("Normalized page to {} chars of text", text.chars().count());

        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Extracting VC data from text using AI...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        let extracted = self.extractor.extract(&text).await;
        spinner.finish_and_clear();
        let extracted = extracted?;

        println!("Saving data into the database...");
        let inserted = self.store.insert(&extracted)?;

        Ok(RunReport {
            url: url.to_string(),
            extracted,
            inserted,
        })
    }
}

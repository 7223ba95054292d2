use super::ui;
use crate::cli::OutputFormat;
use crate::core::{AppError, FetchError, RateProvider, RateSnapshot};
use crate::extract::text::UNAVAILABLE;
use anyhow::Result;
use comfy_table::Cell;
use tracing::warn;

impl RateSnapshot {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Code"),
            ui::header_cell("Currency"),
            ui::header_cell("Spot Sell (per 100)"),
        ]);

        for quote in self.quotes() {
            table.add_row(vec![
                Cell::new(quote.code()),
                Cell::new(quote.name()),
                ui::price_cell(quote.price(), quote.price() == UNAVAILABLE),
            ]);
        }

        let published = if self.published_at().is_empty() {
            ui::style_text("N/A", ui::StyleType::Error)
        } else {
            ui::style_text(self.published_at(), ui::StyleType::Value)
        };

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Bank of China FX Rates", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Published", ui::StyleType::Label),
            published
        ));
        for url in self.source_urls() {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(&format!("Source: {url}"), ui::StyleType::Subtle)
            ));
        }

        output
    }
}

/// Error object printed on stdout in JSON mode. Table mode prints nothing;
/// the returned error is reported once by the caller.
fn failure_output(err: &FetchError, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(&AppError::from(err))?)),
        OutputFormat::Table => Ok(None),
    }
}

pub async fn run(provider: &(dyn RateProvider + Send + Sync), format: OutputFormat) -> Result<()> {
    let pb = ui::new_spinner("Fetching rates...");
    let result = provider.fetch_rates().await;
    pb.finish_and_clear();

    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            if let Some(output) = failure_output(&e, format)? {
                println!("{output}");
            }
            return Err(e.into());
        }
    };

    if snapshot.published_at().is_empty() {
        warn!("Rate page did not report a publish time");
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Table => println!("{}", snapshot.display_as_table()),
    }
    Ok(())
}

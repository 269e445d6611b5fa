//! Detail extraction for one parcel id on the auditor site.
//!
//! Drives the parcel-id search form, distinguishes "no records" from a
//! hit, opens the first matching record and reads a fixed set of fields
//! off the datalet pages, including the rental-contact sub-page.

use crate::error::Result;
use crate::fields::{value_after_colon, FieldExtractor};
use parcelmail_browser::{Lookup, PageActions};
use parcelmail_core::{AuditorSettings, DetailRecord, ParcelId};
use std::time::Duration;

/// Parcel-id input of the search form.
pub const PARID_INPUT: &str = r#"//input[@id="inpParid"]"#;
/// Search submit button.
pub const SEARCH_BUTTON: &str = r#"//button[@id="btSearch"]"#;
/// Marker rendered when the parcel id matches nothing.
pub const NO_RECORDS_MARKER: &str =
    r#"//large[contains(text(), "Your search did not find any records")]"#;
/// First row of the results table.
pub const FIRST_RESULT_ROW: &str = r#"(//table[@id="searchResults"]/tbody/tr)[1]"#;
/// Heading cell shaped "PARID: <id>" on the record page.
pub const PARCEL_HEADING: &str = r#"//td[contains(text(), "PARID:")]"#;
/// Data cell of the legal-description label row.
pub const LEGAL_FIRST_CELL: &str =
    r#"//tr[td[contains(text(), "Legal Description")]]/td[@class="DataletData"]"#;
/// Second cells of the two rows following the legal-description row.
pub const LEGAL_SIBLING_CELLS: &str =
    r#"//tr[td[contains(text(), "Legal Description")]]/following-sibling::tr[position() <= 2]/td[2]"#;
/// Owner-name anchors under the "Owner" labeled row.
pub const OWNER_ANCHORS: &str =
    r#"//tr[td[contains(text(), "Owner")]]/td[@class="DataletData"]/a"#;
/// In-page link to the rental-contact sub-page.
pub const RENTAL_CONTACT_LINK: &str = r#"//a[span[contains(text(), "Rental Contact")]]"#;

/// Dwelling-data cells have no per-field labels; positions are stable.
pub const DWELLING_YEAR_BUILT: &str = r#"(//table[@id="Dwelling Data"]//td)[7]"#;
pub const DWELLING_FINISHED_AREA: &str = r#"(//table[@id="Dwelling Data"]//td)[8]"#;
pub const DWELLING_BEDROOMS: &str = r#"(//table[@id="Dwelling Data"]//td)[10]"#;
pub const DWELLING_BATHROOMS: &str = r#"(//table[@id="Dwelling Data"]//td)[11]"#;

/// Every record in the county is in the same city and state; the page
/// does not carry them as fields.
pub const PROPERTY_CITY: &str = "columbus";
pub const PROPERTY_STATE: &str = "OH";

/// Extracts one [`DetailRecord`] per parcel token via the auditor's
/// search form.
pub struct RecordDetailExtractor<'a, P: PageActions + ?Sized> {
    page: &'a P,
    settings: &'a AuditorSettings,
}

impl<'a, P: PageActions + ?Sized> RecordDetailExtractor<'a, P> {
    pub fn new(page: &'a P, settings: &'a AuditorSettings) -> Self {
        Self { page, settings }
    }

    /// Look up one parcel token and assemble its detail record.
    ///
    /// Invalid tokens (empty or the "N/A" sentinel) return an empty
    /// placeholder without touching the browser. "No records" and a
    /// never-rendering search form both return a record carrying only
    /// the token. Field absence on the record page yields empty strings.
    pub async fn extract(&self, token: &str) -> Result<DetailRecord> {
        let Some(parcel) = ParcelId::new(token) else {
            tracing::debug!("skipping invalid parcel token {token:?}");
            return Ok(DetailRecord::default());
        };

        self.page.navigate(&self.settings.search_url).await?;
        let mut record = DetailRecord::for_token(parcel.as_str());

        if !self.submit_search(&parcel).await? {
            return Ok(record);
        }
        self.settle().await;

        if self.no_records_found().await? {
            tracing::info!("no records for parcel {parcel}");
            return Ok(record);
        }

        self.open_first_row().await?;

        let fields = FieldExtractor::new(
            self.page,
            Duration::from_secs(self.settings.field_timeout_secs),
        );

        // The on-page heading is authoritative when it parses; the
        // caller's token otherwise stands.
        let heading = fields.at(PARCEL_HEADING).await?;
        let refined = value_after_colon(&heading);
        if !refined.is_empty() {
            record.parcel_id = refined;
        }

        record.property_address = fields.labeled("Site (Property) Address").await?;
        record.property_zip = fields.labeled("Zip Code").await?;
        record.legal_description = self.legal_description(&fields).await?;

        let (names, joined) = self.owner_names().await?;
        record.owner_names = names;
        record.owner_names_joined = joined;

        record.property_city = PROPERTY_CITY.to_string();
        record.property_state = PROPERTY_STATE.to_string();

        record.mailing_address = fields.labeled("Owner Mailing /").await?;
        record.contact_address = fields.labeled("Contact Address").await?;

        record.year_built = fields.at(DWELLING_YEAR_BUILT).await?;
        record.finished_area = fields.at(DWELLING_FINISHED_AREA).await?;
        record.bedrooms = fields.at(DWELLING_BEDROOMS).await?;
        record.bathrooms = fields.at(DWELLING_BATHROOMS).await?;

        record.transfer_date = fields.labeled("Transfer Date").await?;
        record.transfer_price = fields.labeled("Transfer Price").await?;
        record.property_class = fields.labeled("Property Class").await?;

        self.open_rental_contact().await?;

        record.owner_name = fields.labeled("Owner Name:").await?;
        record.owner_business = fields.labeled("Owner Business:").await?;
        record.title = fields.labeled("Title:").await?;
        record.address1 = fields.labeled("Address1:").await?;
        record.address2 = fields.labeled("Address2:").await?;
        record.rental_city = fields.labeled("City:").await?;
        record.rental_state = fields.labeled("State:").await?;
        record.zip_code = fields.labeled("Zip Code:").await?;
        record.phone_number = fields.labeled("Phone Number:").await?;
        record.email = fields.labeled("E-Mail Address:").await?;

        tracing::info!(
            parcel = %record.parcel_id,
            owners = record.owner_names.len(),
            "extracted detail record"
        );
        Ok(record)
    }

    /// Type the parcel id and submit. False means the form never
    /// rendered and extraction should stop with the partial record.
    async fn submit_search(&self, parcel: &ParcelId) -> Result<bool> {
        let form_timeout = Duration::from_secs(self.settings.form_timeout_secs);

        match self.page.wait_for(PARID_INPUT, form_timeout).await? {
            Lookup::Found(()) => self.page.fill(PARID_INPUT, parcel.as_str()).await?,
            Lookup::NotFound => {
                tracing::warn!("parcel-id input never rendered");
                return Ok(false);
            }
        }

        match self.page.wait_for(SEARCH_BUTTON, form_timeout).await? {
            Lookup::Found(()) => self.page.click(SEARCH_BUTTON).await?,
            Lookup::NotFound => {
                tracing::warn!("search button never rendered");
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn no_records_found(&self) -> Result<bool> {
        let lookup = self
            .page
            .wait_for(
                NO_RECORDS_MARKER,
                Duration::from_secs(self.settings.no_records_timeout_secs),
            )
            .await?;
        Ok(lookup.is_found())
    }

    /// Open the first search hit. Best-effort: a missing row is logged
    /// and extraction continues against whatever the page shows.
    async fn open_first_row(&self) -> Result<()> {
        let lookup = self
            .page
            .wait_for(
                FIRST_RESULT_ROW,
                Duration::from_secs(self.settings.first_row_timeout_secs),
            )
            .await?;
        match lookup {
            Lookup::Found(()) => {
                self.page.click(FIRST_RESULT_ROW).await?;
                self.settle().await;
            }
            Lookup::NotFound => tracing::warn!("first result row never rendered"),
        }
        Ok(())
    }

    /// Legal description spans the labeled row plus up to two following
    /// rows, joined with newlines. Absence of the label row yields an
    /// empty string, never partial text.
    async fn legal_description(&self, fields: &FieldExtractor<'a, P>) -> Result<String> {
        let head = fields.at(LEGAL_FIRST_CELL).await?;
        if head.is_empty() {
            return Ok(String::new());
        }
        let mut parts = vec![head];
        parts.extend(self.page.text_all(LEGAL_SIBLING_CELLS).await?);
        Ok(parts.join("\n").trim().to_string())
    }

    /// Owner names are multi-valued anchors; zero matches is a normal
    /// outcome, not an error.
    async fn owner_names(&self) -> Result<(Vec<String>, String)> {
        let lookup = self
            .page
            .wait_for(
                OWNER_ANCHORS,
                Duration::from_secs(self.settings.field_timeout_secs),
            )
            .await?;
        if lookup == Lookup::NotFound {
            return Ok((Vec::new(), String::new()));
        }
        let names: Vec<String> = self
            .page
            .text_all(OWNER_ANCHORS)
            .await?
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        let joined = names.join(", ");
        Ok((names, joined))
    }

    /// Navigate to the rental-contact sub-page when the link exists. If
    /// it doesn't, the rental field lookups simply come back empty.
    async fn open_rental_contact(&self) -> Result<()> {
        let lookup = self
            .page
            .wait_for(
                RENTAL_CONTACT_LINK,
                Duration::from_secs(self.settings.field_timeout_secs),
            )
            .await?;
        match lookup {
            Lookup::Found(()) => {
                self.page.click(RENTAL_CONTACT_LINK).await?;
                self.settle().await;
            }
            Lookup::NotFound => tracing::debug!("rental contact link not present"),
        }
        Ok(())
    }

    async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(self.settings.settle_ms)).await;
    }
}

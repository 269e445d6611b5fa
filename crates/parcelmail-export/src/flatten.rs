//! Expansion of detail records into one flat output row per owner.

use crate::names::{split_contact_address, split_full_name};
use parcelmail_core::DetailRecord;

/// One spreadsheet row: a (record, owner-name) pair, or a placeholder
/// row with empty owner fields when the record had no owners.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatOwnerRow {
    pub parcel: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub property_address: String,
    pub property_city: String,
    pub property_state: String,
    pub property_zip_code: String,
    pub description: String,
    pub mailing_address: String,
    pub mailing_city: String,
    pub mailing_state: String,
    pub mailing_zip: String,
    pub owner_name: String,
    pub owner_business: String,
    pub title: String,
    pub address_1: String,
    pub address_2: String,
    pub rental_city: String,
    pub rental_state: String,
    pub rental_zipcode: String,
    pub phone: String,
    pub email: String,
    pub bedroom: String,
    pub bathroom: String,
    pub finished_area: String,
    pub year_built: String,
    pub property_class: String,
    pub transfer_date: String,
    pub transfer_price: String,
}

impl FlatOwnerRow {
    /// Cell values in column order, matching [`crate::COLUMNS`].
    #[must_use]
    pub fn values(&self) -> [&str; 30] {
        [
            &self.parcel,
            &self.full_name,
            &self.first_name,
            &self.last_name,
            &self.property_address,
            &self.property_city,
            &self.property_state,
            &self.property_zip_code,
            &self.description,
            &self.mailing_address,
            &self.mailing_city,
            &self.mailing_state,
            &self.mailing_zip,
            &self.owner_name,
            &self.owner_business,
            &self.title,
            &self.address_1,
            &self.address_2,
            &self.rental_city,
            &self.rental_state,
            &self.rental_zipcode,
            &self.phone,
            &self.email,
            &self.bedroom,
            &self.bathroom,
            &self.finished_area,
            &self.year_built,
            &self.property_class,
            &self.transfer_date,
            &self.transfer_price,
        ]
    }

    fn base(record: &DetailRecord) -> Self {
        Self {
            parcel: record.parcel_id.clone(),
            property_address: record.property_address.clone(),
            property_city: record.property_city.clone(),
            property_state: record.property_state.clone(),
            property_zip_code: record.property_zip.clone(),
            description: record.legal_description.clone(),
            mailing_address: record.mailing_address.clone(),
            owner_name: record.owner_name.clone(),
            owner_business: record.owner_business.clone(),
            title: record.title.clone(),
            address_1: record.address1.clone(),
            address_2: record.address2.clone(),
            rental_city: record.rental_city.clone(),
            rental_state: record.rental_state.clone(),
            rental_zipcode: record.zip_code.clone(),
            phone: record.phone_number.clone(),
            email: record.email.clone(),
            bedroom: record.bedrooms.clone(),
            bathroom: record.bathrooms.clone(),
            finished_area: record.finished_area.clone(),
            year_built: record.year_built.clone(),
            property_class: record.property_class.clone(),
            transfer_date: record.transfer_date.clone(),
            transfer_price: record.transfer_price.clone(),
            ..Self::default()
        }
    }
}

/// Flatten detail records into owner rows.
///
/// Empty placeholder records are skipped. A record with owners yields one
/// row per owner, each carrying the shared fields plus the split name and
/// the contact address split into city/state/zip. A record with no owners
/// yields exactly one row with empty owner-derived fields.
pub fn flatten(records: &[DetailRecord]) -> Vec<FlatOwnerRow> {
    let mut rows = Vec::new();

    for record in records {
        if record.is_empty() {
            continue;
        }

        let owners: Vec<&String> = record
            .owner_names
            .iter()
            .filter(|n| !n.trim().is_empty())
            .collect();

        if owners.is_empty() {
            tracing::debug!(parcel = %record.parcel_id, "no owner names, emitting placeholder row");
            rows.push(FlatOwnerRow::base(record));
            continue;
        }

        let (city, state, zip) = split_contact_address(&record.contact_address);
        for owner in owners {
            let name = split_full_name(owner);
            let mut row = FlatOwnerRow::base(record);
            row.full_name = owner.clone();
            row.first_name = name.first_name;
            row.last_name = name.last_name;
            row.mailing_city = city.clone();
            row.mailing_state = state.clone();
            row.mailing_zip = zip.clone();
            rows.push(row);
        }
    }

    rows
}

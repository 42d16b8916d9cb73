mod crawler;
pub mod listing;

pub use crawler::SgsSource;

use crate::export::DateColumn;

pub const OVERVIEW_URL: &str = "https://campaigns.sgs.com/en/vr/product-recalls-light";
pub const RECORD_URL_TEMPLATE: &str = "https://campaigns.sgs.com/en/vr/product-recalls-light/record?p={page}&d=0&id=18CD45C15541&dc=http&lb=&rec={rec}";

pub const PAGE_SIZE: usize = 10;
/// Used when the overview page does not tell how many recalls there are.
pub const FALLBACK_RECORD_COUNT: usize = 12_421;

pub const EXTENDED_FILENAME: &str = "sgs_data_extended.xlsx";
pub const LISTING_FILENAME: &str = "sgs_data.xlsx";

pub const PUBLICATION_DATE: DateColumn = DateColumn {
    name: "Publication Date",
    format: "%B %d, %Y",
};

pub const PRODUCT_NAME: &str = "Product Name";
pub const NOTICE_URL: &str = "original recall notice url";
pub const PAGE_URL: &str = "page_url";

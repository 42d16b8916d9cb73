mod crawler;

pub use crawler::AseanSource;

pub const DATATABLE_URL: &str = "https://www.aseanconsumer.org/product-alert-datatable";
pub const PRODUCT_URL_PREFIX: &str = "https://www.aseanconsumer.org/product-";

pub const FILENAME: &str = "asean_consumers.xlsx";
pub const PAGE_URL: &str = "page_url";

/// Data-grid query for every alert, newest recall first.
pub const DATATABLE_QUERY: &str = concat!(
    "draw=1",
    "&columns%5B0%5D%5Bdata%5D=recall_date&columns%5B0%5D%5Bname%5D=recall_date",
    "&columns%5B0%5D%5Bsearchable%5D=true&columns%5B0%5D%5Borderable%5D=true",
    "&columns%5B0%5D%5Bsearch%5D%5Bvalue%5D=&columns%5B0%5D%5Bsearch%5D%5Bregex%5D=false",
    "&columns%5B1%5D%5Bdata%5D=picture&columns%5B1%5D%5Bname%5D=picture",
    "&columns%5B1%5D%5Bsearchable%5D=false&columns%5B1%5D%5Borderable%5D=false",
    "&columns%5B1%5D%5Bsearch%5D%5Bvalue%5D=&columns%5B1%5D%5Bsearch%5D%5Bregex%5D=false",
    "&columns%5B2%5D%5Bdata%5D=name&columns%5B2%5D%5Bname%5D=name",
    "&columns%5B2%5D%5Bsearchable%5D=true&columns%5B2%5D%5Borderable%5D=true",
    "&columns%5B2%5D%5Bsearch%5D%5Bvalue%5D=&columns%5B2%5D%5Bsearch%5D%5Bregex%5D=false",
    "&columns%5B3%5D%5Bdata%5D=type&columns%5B3%5D%5Bname%5D=type",
    "&columns%5B3%5D%5Bsearchable%5D=true&columns%5B3%5D%5Borderable%5D=true",
    "&columns%5B3%5D%5Bsearch%5D%5Bvalue%5D=&columns%5B3%5D%5Bsearch%5D%5Bregex%5D=false",
    "&columns%5B4%5D%5Bdata%5D=model_product&columns%5B4%5D%5Bname%5D=model_product",
    "&columns%5B4%5D%5Bsearchable%5D=true&columns%5B4%5D%5Borderable%5D=true",
    "&columns%5B4%5D%5Bsearch%5D%5Bvalue%5D=&columns%5B4%5D%5Bsearch%5D%5Bregex%5D=false",
    "&columns%5B5%5D%5Bdata%5D=country&columns%5B5%5D%5Bname%5D=country",
    "&columns%5B5%5D%5Bsearchable%5D=true&columns%5B5%5D%5Borderable%5D=true",
    "&columns%5B5%5D%5Bsearch%5D%5Bvalue%5D=&columns%5B5%5D%5Bsearch%5D%5Bregex%5D=false",
    "&columns%5B6%5D%5Bdata%5D=jurisdiction_of_recall&columns%5B6%5D%5Bname%5D=jurisdiction_of_recall",
    "&columns%5B6%5D%5Bsearchable%5D=true&columns%5B6%5D%5Borderable%5D=true",
    "&columns%5B6%5D%5Bsearch%5D%5Bvalue%5D=&columns%5B6%5D%5Bsearch%5D%5Bregex%5D=false",
    "&columns%5B7%5D%5Bdata%5D=original_alert&columns%5B7%5D%5Bname%5D=original_alert",
    "&columns%5B7%5D%5Bsearchable%5D=true&columns%5B7%5D%5Borderable%5D=true",
    "&columns%5B7%5D%5Bsearch%5D%5Bvalue%5D=&columns%5B7%5D%5Bsearch%5D%5Bregex%5D=false",
    "&order%5B0%5D%5Bcolumn%5D=0&order%5B0%5D%5Bdir%5D=desc",
    "&start=0&length=100000",
);

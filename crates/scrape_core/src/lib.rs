//! Scrape core: job records, the local job collection and pure display helpers.
mod collection;
mod csv;
mod format;
mod job;
mod notification;
mod request;
mod route;
mod view_model;

pub use collection::JobCollection;
pub use csv::{to_csv, to_pretty_json};
pub use format::{
    calculate_reading_time, format_bytes, format_date, format_timestamp, get_domain_from_url,
    truncate, url_to_directory_name, DEFAULT_BYTE_DECIMALS, DEFAULT_TRUNCATE_LENGTH,
    WORDS_PER_MINUTE,
};
pub use job::{ImageData, JobId, JobRecord, JobStatus, PageData, SitemapData};
pub use notification::{
    Notification, NotificationId, NotificationKind, NotificationList,
    DEFAULT_NOTIFICATION_DURATION,
};
pub use request::{RequestError, ScrapeRequest, MAX_DEPTH, MIN_DEPTH, MIN_TOKEN_LEN};
pub use route::Route;
pub use view_model::{JobRowView, JobsViewModel};

pub mod listing_scanner;
pub mod login_service;
pub mod notifier;
pub mod report_writer;

pub use listing_scanner::ListingScanner;
pub use login_service::LoginService;
pub use notifier::{
    build_notifier, LogNotifier, Notifier, SmtpNotifier, WebhookNotifier, NOTIFICATION_SUBJECT,
};
pub use report_writer::ReportWriter;

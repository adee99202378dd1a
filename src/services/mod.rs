pub mod authenticator;
pub mod credentials;
pub mod job_enumerator;
pub mod ledger;
pub mod report_writer;

pub use authenticator::Authenticator;
pub use credentials::{ApplyConfirmer, AutoConfirm, CredentialPrompt, Credentials, TerminalPrompt};
pub use job_enumerator::{JobEnumerator, RetryPolicy, SearchFilters, SearchQuery, PAGE_SIZE};
pub use ledger::{FileLedgerStore, Ledger, LedgerStore, MemoryLedgerStore};
pub use report_writer::ReportWriter;

pub use attendees::Attendee;
pub use budgets::Budget;
pub use commands::{
    AttendeeInput, BudgetInput, EventInput, ExpenseInput, IncomeInput, RegistrationInput,
    RegistrationPatch, VendorInput,
};
pub use error::EngineError;
pub use events::Event;
pub use expenses::Expense;
pub use incomes::Income;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, LedgerReconciliation, Page, PageRequest};
pub use registrations::{Registration, generate_confirmation_number};
pub use status::{
    AttendeeStatus, BudgetStatus, CheckInStatus, EventStatus, IncomeStatus, PaymentStatus,
    RegistrationPaymentStatus, VendorType,
};
pub use vendors::Vendor;

mod attendees;
mod budgets;
mod commands;
mod error;
mod events;
mod expenses;
mod incomes;
mod money;
mod ops;
mod registrations;
mod status;
mod util;
mod vendors;

type ResultEngine<T> = Result<T, EngineError>;

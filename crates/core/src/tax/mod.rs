//! Quarterly estimated tax: profile, payments and the derived estimate.

mod tax_calculator;
mod tax_model;
mod tax_service;
mod tax_traits;

pub use tax_calculator::{build_tax_estimate, quarter_due_date};
pub use tax_model::{
    AnnualTaxSummary, NewTaxPayment, PaymentStatus, QuarterlyPayment, TaxEstimate, TaxPayment,
    TaxProfile, TaxProfileUpdate,
};
pub use tax_service::TaxService;
pub use tax_traits::TaxServiceTrait;

pub mod expense_form;
pub mod payer_section;
pub mod payment_form;
pub mod split_options;

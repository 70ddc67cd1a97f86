pub mod use_app_data;
pub mod use_comments;
pub mod use_expense_form;
pub mod use_friends;
pub mod use_group_detail;
pub mod use_payment_form;
pub mod use_session;

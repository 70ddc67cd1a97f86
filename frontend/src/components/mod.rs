pub mod activity_page;
pub mod balance_summary;
pub mod comments_panel;
pub mod forms;
pub mod friends_page;
pub mod group_detail;
pub mod groups_page;
pub mod header;
pub mod login_form;
pub mod nav_bar;
pub mod register_form;
pub mod target_selector;
pub mod verify_email;

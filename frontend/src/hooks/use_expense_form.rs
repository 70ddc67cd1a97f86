use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use shared::domain::{submit_expense, ExpenseDraft, ExpenseFormController, FormPhase, OwedShare};
use shared::{ExpenseResponse, Participant, SplitType, UserId};
use wasm_bindgen_futures::spawn_local;
use web_sys::File;
use yew::functional::UseForceUpdateHandle;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::date_utils;
use crate::services::logging::Logger;

/// What the form starts from
#[derive(Clone, PartialEq)]
pub enum ExpenseFormSeed {
    New {
        owner: Participant,
        participants: Vec<Participant>,
        group_id: Option<i64>,
    },
    Existing {
        owner: Participant,
        expense: ExpenseResponse,
        participants: Vec<Participant>,
    },
}

/// Snapshot of the controller for rendering
#[derive(Clone, PartialEq)]
pub struct ExpenseFormState {
    pub draft: ExpenseDraft,
    pub phase: FormPhase,
    pub error: Option<String>,
    pub equal_preview: Option<Vec<OwedShare>>,
    pub editing_existing: bool,
    pub scanning: bool,
    pub scan_error: Option<String>,
    pub scan_notice: Option<String>,
}

pub struct UseExpenseFormResult {
    pub state: ExpenseFormState,
    pub actions: UseExpenseFormActions,
}

#[derive(Clone, PartialEq)]
pub struct UseExpenseFormActions {
    pub on_description_change: Callback<String>,
    pub on_amount_change: Callback<String>,
    pub on_date_change: Callback<NaiveDate>,
    pub on_notes_change: Callback<String>,
    pub on_split_type_change: Callback<SplitType>,
    pub on_split_value_change: Callback<(UserId, String)>,
    pub on_toggle_included: Callback<UserId>,
    pub on_add_payer: Callback<()>,
    pub on_remove_payer: Callback<usize>,
    pub on_payer_user_change: Callback<(usize, Option<UserId>)>,
    pub on_payer_amount_change: Callback<(usize, String)>,
    pub on_receipt_selected: Callback<Option<File>>,
    pub submit: Callback<()>,
}

type SharedController = Rc<RefCell<ExpenseFormController>>;

#[hook]
pub fn use_expense_form(
    api_client: &ApiClient,
    seed: ExpenseFormSeed,
    on_saved: Callback<ExpenseResponse>,
) -> UseExpenseFormResult {
    let controller: SharedController = {
        let config = api_client.config().clone();
        use_mut_ref(move || match seed {
            ExpenseFormSeed::New {
                owner,
                participants,
                group_id,
            } => {
                let mut form = ExpenseFormController::with_config(config, owner, date_utils::today());
                form.set_participants(participants, group_id);
                form
            }
            ExpenseFormSeed::Existing {
                owner,
                expense,
                participants,
            } => ExpenseFormController::from_existing(config, owner, &expense, participants),
        })
    };
    let receipt_file = use_mut_ref(|| Option::<File>::None);
    let scanning = use_state(|| false);
    let scan_error = use_state(|| Option::<String>::None);
    let scan_notice = use_state(|| Option::<String>::None);
    let update = use_force_update();

    // An unmounted form must not apply a late response
    {
        let controller = controller.clone();
        use_effect_with((), move |_| {
            move || {
                controller.borrow_mut().dispose();
            }
        });
    }

    let on_description_change = with_value(&controller, &update, |form, value: String| {
        form.set_description(&value);
    });
    let on_amount_change = with_value(&controller, &update, |form, value: String| {
        form.set_amount_input(&value);
    });
    let on_date_change = with_value(&controller, &update, |form, date: NaiveDate| {
        form.set_date(date);
    });
    let on_notes_change = with_value(&controller, &update, |form, value: String| {
        form.set_notes(&value);
    });
    let on_split_type_change = with_value(&controller, &update, |form, split_type: SplitType| {
        form.set_split_type(split_type);
    });
    let on_split_value_change = with_value(&controller, &update, |form, (user_id, value): (UserId, String)| {
        form.set_split_value(user_id, &value);
    });
    let on_toggle_included = with_value(&controller, &update, |form, user_id: UserId| {
        form.toggle_included(user_id);
    });
    let on_add_payer = with_value(&controller, &update, |form, _: ()| {
        form.add_payer();
    });
    let on_remove_payer = with_value(&controller, &update, |form, index: usize| {
        form.remove_payer(index);
    });
    let on_payer_user_change = with_value(&controller, &update, |form, (index, user_id): (usize, Option<UserId>)| {
        form.set_payer_user(index, user_id);
    });
    let on_payer_amount_change = with_value(&controller, &update, |form, (index, value): (usize, String)| {
        form.set_payer_amount(index, &value);
    });

    let on_receipt_selected = {
        let api_client = api_client.clone();
        let controller = controller.clone();
        let receipt_file = receipt_file.clone();
        let scanning = scanning.clone();
        let scan_error = scan_error.clone();
        let scan_notice = scan_notice.clone();
        let update = update.clone();

        Callback::from(move |file: Option<File>| {
            if !controller.borrow_mut().attach_receipt(file.as_ref().map(File::name)) {
                return;
            }
            *receipt_file.borrow_mut() = file.clone();
            scan_error.set(None);
            scan_notice.set(None);
            update.force_update();

            let Some(file) = file else { return };
            let api_client = api_client.clone();
            let controller = controller.clone();
            let scanning = scanning.clone();
            let scan_error = scan_error.clone();
            let scan_notice = scan_notice.clone();
            let update = update.clone();

            spawn_local(async move {
                scanning.set(true);
                match api_client.scan_receipt(&file).await {
                    Ok(scan) => {
                        let filled = controller.borrow_mut().apply_receipt(&scan);
                        if filled.map_or(false, |f| f.needs_review()) {
                            scan_notice.set(Some("Receipt scanned. Please verify payer and split details.".to_string()));
                        }
                        update.force_update();
                    }
                    Err(e) => {
                        Logger::error_with_component("expense_form", &format!("Receipt scanning error: {}", e));
                        scan_error.set(Some(e.to_string()));
                    }
                }
                scanning.set(false);
            });
        })
    };

    let submit = {
        let api_client = api_client.clone();
        let controller = controller.clone();
        let receipt_file = receipt_file.clone();
        let update = update.clone();

        Callback::from(move |_: ()| {
            let ticket = match controller.borrow_mut().begin_submit() {
                Ok(ticket) => ticket,
                Err(e) => {
                    Logger::debug_with_component("expense_form", &format!("Not submitting: {}", e));
                    update.force_update();
                    return;
                }
            };
            update.force_update();

            let api_client = api_client.clone();
            let controller = controller.clone();
            let attachment = receipt_file.borrow().clone();
            let update = update.clone();
            let on_saved = on_saved.clone();

            spawn_local(async move {
                let result = submit_expense(&api_client, ticket, attachment.as_ref()).await;
                let saved = {
                    let mut form = controller.borrow_mut();
                    form.finish_submit(result);
                    form.saved().cloned()
                };
                update.force_update();

                if let Some(expense) = saved {
                    Logger::info_with_component("expense_form", &format!("Saved expense {}", expense.id));
                    on_saved.emit(expense);
                }
            });
        })
    };

    let state = {
        let form = controller.borrow();
        ExpenseFormState {
            draft: form.draft().clone(),
            phase: form.phase(),
            error: form.error_message(),
            equal_preview: form.equal_preview(),
            editing_existing: form.target() != shared::domain::SubmitTarget::Create,
            scanning: *scanning,
            scan_error: (*scan_error).clone(),
            scan_notice: (*scan_notice).clone(),
        }
    };

    UseExpenseFormResult {
        state,
        actions: UseExpenseFormActions {
            on_description_change,
            on_amount_change,
            on_date_change,
            on_notes_change,
            on_split_type_change,
            on_split_value_change,
            on_toggle_included,
            on_add_payer,
            on_remove_payer,
            on_payer_user_change,
            on_payer_amount_change,
            on_receipt_selected,
            submit,
        },
    }
}

/// Callback that feeds its argument to one controller edit and re-renders
fn with_value<T: 'static>(
    controller: &SharedController,
    update: &UseForceUpdateHandle,
    apply: fn(&mut ExpenseFormController, T),
) -> Callback<T> {
    let controller = controller.clone();
    let update = update.clone();
    Callback::from(move |value: T| {
        apply(&mut controller.borrow_mut(), value);
        update.force_update();
    })
}

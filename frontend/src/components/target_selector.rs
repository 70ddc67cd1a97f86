use shared::{FriendshipResponse, GroupResponse, UserId};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

/// Who a new expense or payment is shared with
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExpenseTarget {
    Group(i64),
    Friend(UserId),
}

impl ExpenseTarget {
    fn to_value(self) -> String {
        match self {
            ExpenseTarget::Group(id) => format!("group:{}", id),
            ExpenseTarget::Friend(id) => format!("friend:{}", id),
        }
    }

    fn from_value(value: &str) -> Option<Self> {
        let (kind, id) = value.split_once(':')?;
        let id = id.parse().ok()?;
        match kind {
            "group" => Some(ExpenseTarget::Group(id)),
            "friend" => Some(ExpenseTarget::Friend(id)),
            _ => None,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct TargetSelectorProps {
    pub groups: Vec<GroupResponse>,
    pub friends: Vec<FriendshipResponse>,
    pub selected: Option<ExpenseTarget>,
    pub on_select: Callback<Option<ExpenseTarget>>,
}

#[function_component(TargetSelector)]
pub fn target_selector(props: &TargetSelectorProps) -> Html {
    let on_change = {
        let on_select = props.on_select.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_select.emit(ExpenseTarget::from_value(&select.value()));
        })
    };
    let selected = props.selected.map(ExpenseTarget::to_value).unwrap_or_default();

    html! {
        <div class="form-group target-selector">
            <label for="expense-target">{"With you and:"}</label>
            <select id="expense-target" onchange={on_change}>
                <option value="" selected={selected.is_empty()}>{"Choose a group or friend"}</option>
                <optgroup label="Groups">
                    {for props.groups.iter().map(|group| {
                        let value = ExpenseTarget::Group(group.id).to_value();
                        html! {
                            <option selected={value == selected} value={value.clone()}>{&group.name}</option>
                        }
                    })}
                </optgroup>
                <optgroup label="Friends">
                    {for props.friends.iter().map(|friendship| {
                        let value = ExpenseTarget::Friend(friendship.other_user.id).to_value();
                        html! {
                            <option selected={value == selected} value={value.clone()}>{&friendship.other_user.name}</option>
                        }
                    })}
                </optgroup>
            </select>
        </div>
    }
}

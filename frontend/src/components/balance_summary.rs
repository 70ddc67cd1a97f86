use rust_decimal::Decimal;
use shared::money::format_money;
use shared::OverallBalanceSummary;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct BalanceSummaryProps {
    pub summary: Option<OverallBalanceSummary>,
    pub loading: bool,
}

#[function_component(BalanceSummary)]
pub fn balance_summary(props: &BalanceSummaryProps) -> Html {
    let Some(summary) = props.summary.as_ref() else {
        return html! {
            <section class="balance-section">
                <div class="loading">{if props.loading { "Loading balances..." } else { "No balances yet" }}</div>
            </section>
        };
    };

    let net = summary.net();
    let (net_label, net_class) = if net > Decimal::ZERO {
        ("You are owed", "balance-amount positive")
    } else if net < Decimal::ZERO {
        ("You owe", "balance-amount negative")
    } else {
        ("All settled up", "balance-amount")
    };

    html! {
        <section class="balance-section">
            <div class="balance-row">
                <span class="balance-label">{"Owed to you"}</span>
                <span class="balance-amount positive">
                    {format_money(summary.total_owed_to_user, &summary.currency)}
                </span>
            </div>
            <div class="balance-row">
                <span class="balance-label">{"You owe"}</span>
                <span class="balance-amount negative">
                    {format_money(summary.total_owed_by_user, &summary.currency)}
                </span>
            </div>
            <div class="balance-row total">
                <span class="balance-label">{net_label}</span>
                <span class={net_class}>{format_money(net.abs(), &summary.currency)}</span>
            </div>
        </section>
    }
}

use yew::prelude::*;

/// Top-level screens of the signed-in app
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum View {
    Dashboard,
    Groups,
    Group(i64),
    Friends,
    Activity,
}

impl View {
    fn label(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Groups | View::Group(_) => "Groups",
            View::Friends => "Friends",
            View::Activity => "Activity",
        }
    }

    /// The tab highlighted for this view; a single group lives under Groups
    fn tab(self) -> View {
        match self {
            View::Group(_) => View::Groups,
            other => other,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct NavBarProps {
    pub current: View,
    pub on_navigate: Callback<View>,
}

#[function_component(NavBar)]
pub fn nav_bar(props: &NavBarProps) -> Html {
    let tabs = [View::Dashboard, View::Groups, View::Friends, View::Activity];

    html! {
        <nav class="nav-bar">
            {for tabs.into_iter().map(|view| {
                let on_navigate = props.on_navigate.clone();
                let class = if props.current.tab() == view { "nav-tab active" } else { "nav-tab" };
                html! {
                    <button class={class} onclick={Callback::from(move |_: MouseEvent| on_navigate.emit(view))}>
                        {view.label()}
                    </button>
                }
            })}
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_view_highlights_groups_tab() {
        assert_eq!(View::Group(7).tab(), View::Groups);
        assert_eq!(View::Group(7).label(), "Groups");
        assert_eq!(View::Activity.tab(), View::Activity);
    }
}

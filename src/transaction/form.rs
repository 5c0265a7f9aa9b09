use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    transaction::{TransactionType, form_state::TransactionFormState, validation::Field},
};

/// The element ID of the error message for `field`.
pub fn field_error_id(field: Field) -> String {
    format!("{}-error", field.as_str())
}

/// The error message slot under a form field, empty when there is no error.
///
/// This is also the fragment returned when a field is validated on blur.
pub fn field_error(field: Field, message: Option<&str>) -> Markup {
    html! {
        p
            id=(field_error_id(field))
            class=(FORM_ERROR_STYLE)
            aria-live="polite"
        {
            @if let Some(message) = message {
                (message)
            }
        }
    }
}

/// Attributes shared by inputs that are validated when they lose focus.
struct BlurValidation {
    url: String,
    target: String,
    clear_error: String,
}

impl BlurValidation {
    fn new(field: Field) -> Self {
        let error_id = field_error_id(field);

        Self {
            url: format!(
                "{}?field={}",
                endpoints::VALIDATE_TRANSACTION_FIELD,
                field.as_str()
            ),
            target: format!("#{error_id}"),
            clear_error: format!("document.getElementById('{error_id}').textContent = ''"),
        }
    }
}

/// The new transaction form with the values and errors in `state`.
pub fn transaction_form(state: &TransactionFormState) -> Markup {
    let is_outflow = state.value(Field::Type) == TransactionType::Outflow.as_str();
    let amount_error = state.error_message(Field::Amount);
    let category_error = state.error_message(Field::Category);
    let amount_blur = BlurValidation::new(Field::Amount);
    let category_blur = BlurValidation::new(Field::Category);

    html! {
        form
            id="transaction-form"
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="find button[type='submit']"
            novalidate
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "New Transaction" }

            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Transaction type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for (type_, is_checked) in [
                        (TransactionType::Inflow, !is_outflow),
                        (TransactionType::Outflow, is_outflow),
                    ] {
                        div class="flex items-center gap-3"
                        {
                            input
                                name="type"
                                id={ "transaction-type-" (type_.as_str()) }
                                type="radio"
                                value=(type_.as_str())
                                checked[is_checked]
                                required
                                class=(FORM_RADIO_INPUT_STYLE);

                            label
                                for={ "transaction-type-" (type_.as_str()) }
                                class=(FORM_RADIO_LABEL_STYLE)
                            {
                                (type_.label())
                            }
                        }
                    }
                }

                (field_error(Field::Type, state.error_message(Field::Type).as_deref()))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    name="amount"
                    id="amount"
                    type="text"
                    inputmode="numeric"
                    placeholder="In minor units, e.g. 1250"
                    required
                    autofocus
                    value=(state.value(Field::Amount))
                    aria-invalid=[amount_error.is_some().then_some("true")]
                    hx-post=(amount_blur.url)
                    hx-trigger="blur"
                    hx-target=(amount_blur.target)
                    hx-swap="outerHTML"
                    oninput=(amount_blur.clear_error)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(Field::Amount, amount_error.as_deref()))
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    required
                    value=(state.value(Field::Date))
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(Field::Date, state.error_message(Field::Date).as_deref()))
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    name="category"
                    id="category"
                    type="text"
                    placeholder="e.g. groceries"
                    required
                    value=(state.value(Field::Category))
                    aria-invalid=[category_error.is_some().then_some("true")]
                    hx-post=(category_blur.url)
                    hx-trigger="blur"
                    hx-target=(category_blur.target)
                    hx-swap="outerHTML"
                    oninput=(category_blur.clear_error)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(Field::Category, category_error.as_deref()))
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Optional"
                    value=(state.value(Field::Description))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button
                type="submit"
                id="submit-button"
                tabindex="0"
                disabled[state.is_submitting()]
                class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator"
                {
                    (loading_spinner())
                }
                " Add Transaction"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::{UtcOffset, macros::date};

    use crate::{
        endpoints,
        test_utils::{assert_form_input, assert_form_submit_button, assert_hx_endpoint, must_get_form},
        transaction::{form_state::TransactionFormState, validation::Field},
    };

    use super::{field_error, transaction_form};

    fn render(state: &TransactionFormState) -> Html {
        Html::parse_fragment(&transaction_form(state).into_string())
    }

    #[test]
    fn form_has_expected_inputs() {
        let html = render(&TransactionFormState::new(date!(2024 - 05 - 20)));
        let form = must_get_form(&html);

        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "amount", "text");
        assert_form_input(&form, "date", "date");
        assert_form_input(&form, "category", "text");
        assert_form_submit_button(&form);
    }

    #[test]
    fn defaults_to_inflow() {
        let html = render(&TransactionFormState::new(date!(2024 - 05 - 20)));

        let checked: Vec<&str> = html
            .select(&Selector::parse("input[type=radio][checked]").unwrap())
            .filter_map(|input| input.value().attr("value"))
            .collect();

        assert_eq!(checked, ["inflow"]);
    }

    #[test]
    fn blur_inputs_post_to_validation_endpoint() {
        let html = render(&TransactionFormState::new(date!(2024 - 05 - 20)));

        let amount = html
            .select(&Selector::parse("input[name=amount]").unwrap())
            .next()
            .unwrap();

        assert_eq!(
            amount.value().attr("hx-post"),
            Some("/api/transactions/validate?field=amount")
        );
        assert_eq!(amount.value().attr("hx-trigger"), Some("blur"));
        assert_eq!(amount.value().attr("hx-target"), Some("#amount-error"));
    }

    #[test]
    fn submit_button_is_disabled_while_in_flight() {
        let html = render(&TransactionFormState::new(date!(2024 - 05 - 20)));
        let form = must_get_form(&html);

        assert_hx_endpoint(&form, "find button[type='submit']", "hx-disabled-elt");
    }

    #[test]
    fn shows_errors_after_failed_submit() {
        let mut state = TransactionFormState::new(date!(2024 - 05 - 20));
        state.on_change(Field::Amount, "12.5");
        state.on_change(Field::Category, "   ");
        state.submit(UtcOffset::UTC);

        let html = render(&state);

        let amount_error: String = html
            .select(&Selector::parse("#amount-error").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        let category_error: String = html
            .select(&Selector::parse("#category-error").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();

        assert_eq!(amount_error.trim(), "Amount must be a positive whole number");
        assert_eq!(category_error.trim(), "Category cannot be only whitespace");
    }

    #[test]
    fn empty_error_slot_has_no_text() {
        let html = Html::parse_fragment(&field_error(Field::Amount, None).into_string());

        let text: String = html.root_element().text().collect();

        assert!(text.trim().is_empty());
    }
}

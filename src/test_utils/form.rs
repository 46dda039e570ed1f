use scraper::{ElementRef, Html, Selector};

fn selector(selectors: &str) -> Selector {
    Selector::parse(selectors).unwrap_or_else(|error| panic!("bad selector {selectors}: {error}"))
}

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&selector("form"))
        .next()
        .expect("No form found")
}

/// Check that `form` sends its request to `endpoint` with the htmx `attribute`,
/// e.g. "hx-post".
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form.value().attr(attribute);

    assert_eq!(
        got,
        Some(endpoint),
        "want form with attribute {attribute}=\"{endpoint}\", got {got:?}"
    );
}

#[track_caller]
fn must_get_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    let input = form
        .select(&selector(&format!("input[name=\"{name}\"]")))
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""));

    assert!(
        input.value().attr("required").is_some(),
        "want input with name {name} to have the required attribute but got none"
    );

    input
}

/// Check that `form` has a required input called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_input(form, name);
    let input_type = input.value().attr("type").unwrap_or_default();

    assert_eq!(
        input_type, type_,
        "want input {name} with type \"{type_}\", got {input_type:?}"
    );
}

/// Like [assert_form_input], but also checks the prefilled value.
#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    assert_form_input(form, name, type_);

    let input_value = must_get_input(form, name)
        .value()
        .attr("value")
        .unwrap_or_default();
    assert_eq!(
        input_value, value,
        "want input {name} with value \"{value}\", got {input_value:?}"
    );
}

/// Check for a required number input called "amount" that accepts cents.
#[track_caller]
pub(crate) fn assert_amount_input(form: &ElementRef<'_>) {
    assert_form_input(form, "amount", "number");

    let step = must_get_input(form, "amount").value().attr("step");
    assert_eq!(
        step,
        Some("0.01"),
        "want amount input to step by cents, got step={step:?}"
    );
}

#[track_caller]
fn must_get_submit_button<'a>(form: &ElementRef<'a>) -> ElementRef<'a> {
    let button = form.select(&selector("button")).next().expect("No button found");

    assert_eq!(
        button.value().attr("type"),
        Some("submit"),
        "want submit button with type=\"submit\""
    );

    button
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    must_get_submit_button(form);
}

/// Check the submit button's label, ignoring the loading spinner.
#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let got_text = must_get_submit_button(form).text().collect::<String>();

    assert_eq!(text, got_text.trim());
}

/// Check the message shown under the form's fields.
///
/// Forms render at most one message, in the first `p` element.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let got_error_message = form
        .select(&selector("p"))
        .next()
        .expect("No error message found")
        .text()
        .collect::<String>();

    assert_eq!(want_error_message, got_error_message.trim());
}

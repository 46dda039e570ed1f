//! Assertions shared by the handler tests.
#![allow(missing_docs)]

mod form;
mod html;
mod http;

pub(crate) use form::{
    assert_amount_input, assert_form_error_message, assert_form_input,
    assert_form_input_with_value, assert_form_submit_button, assert_form_submit_button_with_text,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{
    assert_valid_html, body_text, must_get_text, parse_html_document, parse_html_fragment,
};
pub(crate) use http::{assert_content_type, assert_hx_redirect, assert_status_ok, get_header};

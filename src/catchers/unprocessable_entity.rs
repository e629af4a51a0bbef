use crate::templates;
use rocket::response::content::RawHtml;
use rocket::response::status::BadRequest;
use rocket::Request;

#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_req: &Request) -> BadRequest<RawHtml<String>> {
    BadRequest(RawHtml(templates::bad_request_page(
        "The submitted form is missing a field.",
    )))
}

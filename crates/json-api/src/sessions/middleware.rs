//! Session middleware.
//!
//! Every cart route is scoped to the session named in `X-Session`. The
//! `X-Form-Token` header is optional here; mutating handlers require it and
//! the carts service validates it before touching the cart.

use salvo::prelude::*;

use appointime_app::sessions::records::SessionUuid;

use crate::extensions::*;

pub(crate) const SESSION_HEADER: &str = "x-session";
pub(crate) const FORM_TOKEN_HEADER: &str = "x-form-token";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(session) = extract_session(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid X-Session header"));

        return;
    };

    depot.insert_session(session);

    if let Some(token) = req
        .header::<String>(FORM_TOKEN_HEADER)
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
    {
        depot.insert_form_token(token);
    }

    ctrl.call_next(req, depot, res).await;
}

fn extract_session(req: &Request) -> Option<SessionUuid> {
    req.header::<String>(SESSION_HEADER)?.trim().parse().ok()
}

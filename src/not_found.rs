use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Something's missing.",
            "Sorry, we can't find that page. You'll find lots to explore on the dashboard.",
        ),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{
        build_router,
        test_utils::{assert_content_type, assert_valid_html, get_test_app_state, parse_html_document},
    };

    use super::get_404_not_found_response;

    #[tokio::test]
    async fn renders_not_found_page() {
        let response = get_404_not_found_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
    }

    #[tokio::test]
    async fn unknown_route_falls_back_to_not_found() {
        let server = TestServer::new(build_router(get_test_app_state()));

        let response = server.get("/no/such/page").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

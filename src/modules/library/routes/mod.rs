use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use shelf_authz::Address;
use shelf_http::{AppResult, Caller};

use super::models::{AddBook, BookByName, OwnerResponse};
use super::registry::{BookId, BookView};
use super::service::{LibraryService, Receipt};

/// Routes for the library module, relative to its mount path.
pub fn router(service: LibraryService) -> Router {
    Router::new()
        .route("/owner", get(owner))
        .route("/books", get(all_books).post(add_book))
        .route("/books/available", get(all_available_books))
        .route("/books/by-name", get(book_by_name))
        .route("/books/{id}/history", get(book_history))
        .route("/books/{id}/borrow", post(borrow_book))
        .route("/books/{id}/return", post(return_book))
        .with_state(service)
}

async fn owner(State(service): State<LibraryService>) -> Json<OwnerResponse> {
    Json(OwnerResponse {
        owner: service.owner(),
    })
}

async fn add_book(
    State(service): State<LibraryService>,
    Caller(caller): Caller,
    body: Result<Json<AddBook>, JsonRejection>,
) -> AppResult<Json<Receipt>> {
    let Json(body) = body?;
    let receipt = service
        .add_book(caller, &body.name, &body.author, body.copies)
        .await?;
    Ok(Json(receipt))
}

async fn borrow_book(
    State(service): State<LibraryService>,
    Caller(caller): Caller,
    id: Result<Path<BookId>, PathRejection>,
) -> AppResult<Json<Receipt>> {
    let Path(id) = id?;
    Ok(Json(service.borrow_book(caller, id).await?))
}

async fn return_book(
    State(service): State<LibraryService>,
    Caller(caller): Caller,
    id: Result<Path<BookId>, PathRejection>,
) -> AppResult<Json<Receipt>> {
    let Path(id) = id?;
    Ok(Json(service.return_book(caller, id).await?))
}

async fn book_by_name(
    State(service): State<LibraryService>,
    query: Result<Query<BookByName>, QueryRejection>,
) -> AppResult<Json<BookView>> {
    let Query(query) = query?;
    Ok(Json(service.book_by_name(&query.name).await?))
}

async fn book_history(
    State(service): State<LibraryService>,
    id: Result<Path<BookId>, PathRejection>,
) -> AppResult<Json<Vec<Address>>> {
    let Path(id) = id?;
    Ok(Json(service.book_history(id).await?))
}

async fn all_books(State(service): State<LibraryService>) -> Json<Vec<BookView>> {
    Json(service.all_books().await)
}

async fn all_available_books(State(service): State<LibraryService>) -> Json<Vec<BookView>> {
    Json(service.all_available_books().await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use shelf_kernel::{settings::Settings, ModuleRegistry};
    use tower::ServiceExt;

    use super::super::LibraryModule;
    use super::*;

    const OWNER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const ALICE: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    struct Harness {
        router: Router,
    }

    impl Harness {
        fn deploy() -> Self {
            let settings = Settings::default();
            let service = LibraryService::deploy(settings.library.owner, 16);
            let mut registry = ModuleRegistry::new();
            registry
                .register(Arc::new(LibraryModule::new(service)))
                .unwrap();
            Self {
                router: shelf_http::build_router(&registry, &settings),
            }
        }

        async fn call(
            &self,
            method: Method,
            path: &str,
            caller: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder()
                .method(method)
                .uri(format!("/api/library{path}"));
            if let Some(caller) = caller {
                request = request.header("x-caller-address", caller);
            }
            let request = match body {
                Some(body) => request
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => request.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }

        async fn add(&self, caller: &str, name: &str, author: &str, copies: u64) -> (StatusCode, Value) {
            self.call(
                Method::POST,
                "/books",
                Some(caller),
                Some(json!({ "name": name, "author": author, "copies": copies })),
            )
            .await
        }

        async fn get(&self, path: &str) -> (StatusCode, Value) {
            self.call(Method::GET, path, None, None).await
        }

        async fn post(&self, path: &str, caller: &str) -> (StatusCode, Value) {
            self.call(Method::POST, path, Some(caller), None).await
        }
    }

    fn reason(body: &Value) -> &str {
        body["error"]["message"].as_str().unwrap()
    }

    #[tokio::test]
    async fn fresh_deployment_has_no_books_and_reports_owner() {
        let app = Harness::deploy();

        assert_eq!(app.get("/books").await, (StatusCode::OK, json!([])));
        assert_eq!(
            app.get("/owner").await,
            (StatusCode::OK, json!({ "owner": OWNER }))
        );
    }

    #[tokio::test]
    async fn add_then_update_emits_matching_notifications() {
        let app = Harness::deploy();

        let (status, receipt) = app.add(OWNER, "Lord of The Rings", "J.R.R Tolkien", 10).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            receipt,
            json!({ "events": [{
                "event": "NewBookAdded",
                "id": 0,
                "name": "Lord of The Rings",
                "author": "J.R.R Tolkien",
                "copies": 10
            }]})
        );

        let (_, receipt) = app.add(OWNER, "Lord of The Rings", "J.R.R Tolkien", 15).await;
        assert_eq!(
            receipt,
            json!({ "events": [{ "event": "BookCopiesUpdated", "id": 0, "copies": 15 }] })
        );
        assert_eq!(
            app.get("/books").await.1,
            json!([{ "name": "Lord of The Rings", "author": "J.R.R Tolkien", "copies": 15 }])
        );
    }

    #[tokio::test]
    async fn non_owner_cannot_add_books() {
        let app = Harness::deploy();

        let (status, body) = app.add(ALICE, "Lord of The Rings", "J.R.R Tolkien", 10).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "not_owner");
        assert_eq!(reason(&body), "Ownable: caller is not the owner");
        assert_eq!(app.get("/books").await.1, json!([]));
    }

    #[tokio::test]
    async fn invalid_book_arguments_are_rejected() {
        let app = Harness::deploy();

        let (status, body) = app.add(OWNER, "Lord of The Rings", "J.R.R Tolkien", 0).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reason(&body), "Book copies cannot be 0!");

        let (_, body) = app.add(OWNER, "", "J.R.R Tolkien", 10).await;
        assert_eq!(reason(&body), "Book name cannot be empty!");

        let (_, body) = app.add(OWNER, "Lord of The Rings", "", 10).await;
        assert_eq!(reason(&body), "Author name cannot be empty!");
    }

    #[tokio::test]
    async fn malformed_requests_use_the_error_envelope() {
        let app = Harness::deploy();

        let (status, body) = app
            .call(
                Method::POST,
                "/books",
                Some(OWNER),
                Some(json!({ "name": "Dune", "author": "F. Herbert", "copies": -1 })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "invalid_body");
        assert!(reason(&body).contains("expected u64"));

        let (status, body) = app
            .call(Method::POST, "/books", Some(OWNER), Some(json!({ "name": "Dune" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(reason(&body).contains("author"));

        let (status, body) = app.get("/books/first/history").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_path");

        let (status, body) = app.post("/books/-1/borrow", ALICE).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_path");

        let (status, body) = app.get("/books/by-name?name=Dune&name=Emma").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_query");
    }

    #[tokio::test]
    async fn mutations_require_a_caller() {
        let app = Harness::deploy();

        let (status, body) = app
            .call(
                Method::POST,
                "/books/0/borrow",
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");

        let (status, _) = app.post("/books/0/borrow", "not-an-address").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn borrow_and_return_flow() {
        let app = Harness::deploy();
        app.add(OWNER, "Lord of The Rings", "J.R.R Tolkien", 10).await;

        let (status, receipt) = app.post("/books/0/borrow", ALICE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            receipt,
            json!({ "events": [{ "event": "BookBorrowed", "book_id": 0, "borrower": ALICE }] })
        );

        let (status, body) = app.post("/books/0/borrow", ALICE).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "invalid_loan_state");
        assert_eq!(reason(&body), "Cannot borrow same book twice!");

        let (status, body) = app.post("/books/0/return", OWNER).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(reason(&body), "Cannot return book, which wasn't borrowed!");

        let (status, receipt) = app.post("/books/0/return", ALICE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(receipt["events"][0]["event"], "BookReturned");

        assert_eq!(app.get("/books").await.1[0]["copies"], 10);
        assert_eq!(
            app.get("/books/0/history").await,
            (StatusCode::OK, json!([ALICE]))
        );
    }

    #[tokio::test]
    async fn out_of_stock_and_available_view() {
        let app = Harness::deploy();
        app.add(OWNER, "Lord of The Rings", "J.R.R Tolkien", 10).await;
        app.add(OWNER, "Sword of Destiny", "A. Sapkowski", 1).await;
        app.post("/books/1/borrow", OWNER).await;

        let (status, body) = app.post("/books/1/borrow", ALICE).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "out_of_stock");
        assert_eq!(reason(&body), "Cannot borrow book. No more books in stock.");

        assert_eq!(
            app.get("/books/available").await.1,
            json!([
                { "name": "Lord of The Rings", "author": "J.R.R Tolkien", "copies": 10 },
                { "name": "", "author": "", "copies": 0 }
            ])
        );
    }

    #[tokio::test]
    async fn unknown_books_are_not_found() {
        let app = Harness::deploy();

        let (status, body) = app.get("/books/1/history").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "book_not_found");
        assert_eq!(reason(&body), "Book with given id does not exist!");

        let (status, _) = app.post("/books/7/return", ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lookup_by_name() {
        let app = Harness::deploy();
        app.add(OWNER, "Lord of The Rings", "J.R.R Tolkien", 10).await;

        assert_eq!(
            app.get("/books/by-name?name=Lord%20of%20The%20Rings").await,
            (
                StatusCode::OK,
                json!({ "name": "Lord of The Rings", "author": "J.R.R Tolkien", "copies": 10 })
            )
        );

        let (status, body) = app.get("/books/by-name?name=").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reason(&body), "Book name cannot be empty!");

        let (status, _) = app.get("/books/by-name").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app.get("/books/by-name?name=The%20Hobbit").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

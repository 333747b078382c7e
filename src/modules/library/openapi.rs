//! OpenAPI fragment for the library module, merged by the HTTP facade.

use serde_json::{json, Value};

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn error_response(description: &str) -> Value {
    json_response(
        description,
        json!({ "$ref": "#/components/schemas/ErrorResponse" }),
    )
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn caller_header(name: &str) -> Value {
    json!({
        "name": name,
        "in": "header",
        "required": true,
        "description": "Verified address of the caller",
        "schema": { "$ref": "#/components/schemas/Address" }
    })
}

fn book_id_param() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64", "minimum": 0 }
    })
}

fn loan_operation(summary: &str, operation_id: &str, caller: &str) -> Value {
    json!({
        "post": {
            "summary": summary,
            "operationId": operation_id,
            "tags": ["Library"],
            "parameters": [book_id_param(), caller_header(caller)],
            "responses": {
                "200": json_response("Committed", schema_ref("Receipt")),
                "401": error_response("Missing caller"),
                "404": error_response("Book with given id does not exist!"),
                "409": error_response("Out of stock or invalid loan state")
            }
        }
    })
}

/// Build the fragment, documenting `caller` as the caller identity header.
pub fn fragment(caller: &str) -> Value {
    let book_list = json!({ "type": "array", "items": schema_ref("BookView") });

    json!({
        "paths": {
            "/owner": {
                "get": {
                    "summary": "Registry owner",
                    "operationId": "owner",
                    "tags": ["Library"],
                    "responses": {
                        "200": json_response("Owner address", json!({
                            "type": "object",
                            "properties": { "owner": schema_ref("Address") },
                            "required": ["owner"]
                        }))
                    }
                }
            },
            "/books": {
                "get": {
                    "summary": "All books in id order",
                    "operationId": "allBooks",
                    "tags": ["Library"],
                    "responses": { "200": json_response("Books", book_list.clone()) }
                },
                "post": {
                    "summary": "Add a book or set the copies of an existing one (owner only)",
                    "operationId": "addBook",
                    "tags": ["Library"],
                    "parameters": [caller_header(caller)],
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": schema_ref("AddBook") } }
                    },
                    "responses": {
                        "200": json_response("Committed", schema_ref("Receipt")),
                        "403": error_response("Caller is not the owner"),
                        "422": error_response("Empty name or author, or zero copies")
                    }
                }
            },
            "/books/available": {
                "get": {
                    "summary": "All books with out-of-stock entries blanked in place",
                    "operationId": "allAvailableBooks",
                    "tags": ["Library"],
                    "responses": { "200": json_response("Books", book_list) }
                }
            },
            "/books/by-name": {
                "get": {
                    "summary": "Look a book up by exact name",
                    "operationId": "bookByName",
                    "tags": ["Library"],
                    "parameters": [{
                        "name": "name",
                        "in": "query",
                        "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": json_response("Book", schema_ref("BookView")),
                        "404": error_response("No book with that name"),
                        "422": error_response("Empty name")
                    }
                }
            },
            "/books/{id}/history": {
                "get": {
                    "summary": "Every address that borrowed the book, oldest first",
                    "operationId": "bookHistory",
                    "tags": ["Library"],
                    "parameters": [book_id_param()],
                    "responses": {
                        "200": json_response("Borrowers", json!({
                            "type": "array",
                            "items": schema_ref("Address")
                        })),
                        "404": error_response("Book with given id does not exist!")
                    }
                }
            },
            "/books/{id}/borrow": loan_operation("Borrow one copy", "borrowBook", caller),
            "/books/{id}/return": loan_operation("Return a borrowed copy", "returnBook", caller)
        },
        "components": {
            "schemas": {
                "Address": {
                    "type": "string",
                    "pattern": "^0x[0-9a-fA-F]{40}$"
                },
                "BookView": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "author": { "type": "string" },
                        "copies": { "type": "integer", "format": "int64", "minimum": 0 }
                    },
                    "required": ["name", "author", "copies"]
                },
                "AddBook": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "author": { "type": "string" },
                        "copies": { "type": "integer", "format": "int64", "minimum": 1 }
                    },
                    "required": ["name", "author", "copies"]
                },
                "Receipt": {
                    "type": "object",
                    "properties": {
                        "events": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "event": {
                                        "type": "string",
                                        "enum": [
                                            "NewBookAdded",
                                            "BookCopiesUpdated",
                                            "BookBorrowed",
                                            "BookReturned"
                                        ]
                                    }
                                },
                                "required": ["event"]
                            }
                        }
                    },
                    "required": ["events"]
                }
            }
        }
    })
}

use serde_json::{json, Value};
use tracing::info;

use crate::clients::UsersClient;
use crate::domain::{
    NewUser, RemoteUser, UserPatch, CANT_BE_BLANK, GENDER_BLANK, INVALID_TOKEN, IS_INVALID,
    RESOURCE_NOT_FOUND,
};
use crate::error::{AssertionError, CheckError};
use crate::suite::{expect, SuiteState};

/// Token sent by the unauthenticated checks.
pub const INVALID_TOKEN_VALUE: &str = "invalid_token";
/// An id no real record is expected to have.
pub const MISSING_USER_ID: u64 = 999_999_999;
pub const UPDATED_NAME: &str = "updated name";

pub struct SuiteContext {
    pub client: UsersClient,
    pub unauthorized: UsersClient,
    pub page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    CreateUser,
    UpdateUser,
    GetUser,
    DeleteUser,
    ListUsers,
}

impl Group {
    pub fn route(&self) -> &'static str {
        match self {
            Group::CreateUser => "POST /users",
            Group::UpdateUser => "PATCH /users/:id",
            Group::GetUser => "GET /users/:id",
            Group::DeleteUser => "DELETE /users/:id",
            Group::ListUsers => "GET /users",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    CreateUnauthorized,
    CreateInvalidBody,
    CreateUser,
    UpdateUnauthorized,
    UpdateInvalidBody,
    UpdateUser,
    GetUnauthorized,
    GetNotFound,
    GetUser,
    DeleteUnauthorized,
    DeleteNotFound,
    DeleteUser,
    ListUnauthorized,
    ListUsers,
    ListUsersPaginated,
}

impl Check {
    /// Execution order. Later groups depend on the id recorded by
    /// [`Check::CreateUser`], so this must not be reordered.
    pub const SEQUENCE: [Check; 15] = [
        Check::CreateUnauthorized,
        Check::CreateInvalidBody,
        Check::CreateUser,
        Check::UpdateUnauthorized,
        Check::UpdateInvalidBody,
        Check::UpdateUser,
        Check::GetUnauthorized,
        Check::GetNotFound,
        Check::GetUser,
        Check::DeleteUnauthorized,
        Check::DeleteNotFound,
        Check::DeleteUser,
        Check::ListUnauthorized,
        Check::ListUsers,
        Check::ListUsersPaginated,
    ];

    pub fn group(&self) -> Group {
        match self {
            Check::CreateUnauthorized | Check::CreateInvalidBody | Check::CreateUser => {
                Group::CreateUser
            }
            Check::UpdateUnauthorized | Check::UpdateInvalidBody | Check::UpdateUser => {
                Group::UpdateUser
            }
            Check::GetUnauthorized | Check::GetNotFound | Check::GetUser => Group::GetUser,
            Check::DeleteUnauthorized | Check::DeleteNotFound | Check::DeleteUser => {
                Group::DeleteUser
            }
            Check::ListUnauthorized | Check::ListUsers | Check::ListUsersPaginated => {
                Group::ListUsers
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Check::CreateUnauthorized
            | Check::UpdateUnauthorized
            | Check::GetUnauthorized
            | Check::DeleteUnauthorized
            | Check::ListUnauthorized => "should return 401 if the request is unauthorized",
            Check::CreateInvalidBody | Check::UpdateInvalidBody => {
                "should return 422 if the request body is invalid"
            }
            Check::CreateUser => "should create a new user and return the user object",
            Check::UpdateUser => "should update the user and return the updated user object",
            Check::GetNotFound | Check::DeleteNotFound => {
                "should return 404 if the user does not exist"
            }
            Check::GetUser => "should return the user object",
            Check::DeleteUser => "should delete the user and return 204",
            Check::ListUsers => "should return a list of users",
            Check::ListUsersPaginated => "should return a list of users with pagination",
        }
    }

    pub async fn run(self, ctx: &SuiteContext, state: &mut SuiteState) -> Result<(), CheckError> {
        match self {
            Check::CreateUnauthorized => {
                let response = ctx.unauthorized.create_user(&state.expected).await?;
                expect::message(&response, 401, INVALID_TOKEN)?;
            }
            Check::CreateInvalidBody => {
                let response = ctx.client.create_user(&json!({ "name": "test" })).await?;
                expect::status(&response, 422)?;
                expect::body_matches(
                    &response,
                    &json!([
                        { "field": "email", "message": CANT_BE_BLANK },
                        { "field": "gender", "message": GENDER_BLANK },
                        { "field": "status", "message": CANT_BE_BLANK },
                    ]),
                )?;
            }
            Check::CreateUser => create_user(ctx, state).await?,
            Check::UpdateUnauthorized => {
                let id = state.require_user_id()?;
                let response = ctx.unauthorized.update_user(id, &state.expected).await?;
                expect::message(&response, 401, INVALID_TOKEN)?;
            }
            Check::UpdateInvalidBody => {
                let id = state.require_user_id()?;
                let response = ctx.client.update_user(id, &UserPatch::email("test")).await?;
                expect::status(&response, 422)?;
                expect::body_matches(&response, &json!([{ "field": "email", "message": IS_INVALID }]))?;
            }
            Check::UpdateUser => update_user(ctx, state).await?,
            Check::GetUnauthorized => {
                let id = state.require_user_id()?;
                let response = ctx.unauthorized.get_user(id).await?;
                expect::message(&response, 401, INVALID_TOKEN)?;
            }
            Check::GetNotFound => {
                let response = ctx.client.get_user(MISSING_USER_ID).await?;
                expect::message(&response, 404, RESOURCE_NOT_FOUND)?;
            }
            Check::GetUser => {
                let id = state.require_user_id()?;
                let response = ctx.client.get_user(id).await?;
                expect::status(&response, 200)?;
                expect::body_matches(&response, &expected_record(id, &state.expected)?)?;
            }
            Check::DeleteUnauthorized => {
                let id = state.require_user_id()?;
                let response = ctx.unauthorized.delete_user(id).await?;
                expect::message(&response, 401, INVALID_TOKEN)?;
            }
            Check::DeleteNotFound => {
                let response = ctx.client.delete_user(MISSING_USER_ID).await?;
                expect::message(&response, 404, RESOURCE_NOT_FOUND)?;
            }
            Check::DeleteUser => {
                let id = state.require_user_id()?;
                let response = ctx.client.delete_user(id).await?;
                expect::status(&response, 204)?;
                expect::empty_body(&response)?;
            }
            Check::ListUnauthorized => {
                let response = ctx.unauthorized.list_users().await?;
                expect::message(&response, 401, INVALID_TOKEN)?;
            }
            Check::ListUsers => {
                let response = ctx.client.list_users().await?;
                expect::status(&response, 200)?;
                expect::non_empty_list(&response)?;
            }
            Check::ListUsersPaginated => list_users_paginated(ctx).await?,
        }
        Ok(())
    }
}

async fn create_user(ctx: &SuiteContext, state: &mut SuiteState) -> Result<(), CheckError> {
    let response = ctx.client.create_user(&state.expected).await?;
    expect::status(&response, 201)?;
    expect::body_matches(&response, &to_json(&state.expected)?)?;

    let id = response
        .body
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| AssertionError::Body {
            path: "$.id".to_string(),
            expected: "an integer id".to_string(),
            actual: response.body.get("id").map_or("<missing>".to_string(), Value::to_string),
        })?;
    state.user_id = Some(id);
    info!(user_id = id, "Recorded created user");
    Ok(())
}

/// The local expectation only takes the new name once the server has echoed
/// it, and is then checked against a fresh read of the record.
async fn update_user(ctx: &SuiteContext, state: &mut SuiteState) -> Result<(), CheckError> {
    let id = state.require_user_id()?;
    let patch = UserPatch::name(UPDATED_NAME);

    let response = ctx.client.update_user(id, &patch).await?;
    expect::status(&response, 200)?;
    expect::body_matches(&response, &to_json(&patch)?)?;
    state.expected.apply(&patch);

    let refetched = ctx.client.get_user(id).await?;
    expect::status(&refetched, 200)?;
    expect::body_matches(&refetched, &expected_record(id, &state.expected)?)?;
    Ok(())
}

async fn list_users_paginated(ctx: &SuiteContext) -> Result<(), CheckError> {
    let response = ctx.client.list_users_page(1, ctx.page_size).await?;
    expect::status(&response, 200)?;
    expect::list_len(&response, ctx.page_size as usize)?;
    expect::positive_header(&response, "x-pagination-total")?;
    expect::positive_header(&response, "x-pagination-pages")?;
    expect::header_equals(&response, "x-pagination-page", 1)?;
    expect::header_equals(&response, "x-pagination-limit", u64::from(ctx.page_size))?;
    Ok(())
}

fn expected_record(id: u64, user: &NewUser) -> Result<Value, CheckError> {
    to_json(&RemoteUser {
        id,
        fields: user.clone(),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, CheckError> {
    Ok(serde_json::to_value(value)?)
}

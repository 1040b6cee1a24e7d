//! Target- and database-level checks: existence, project state, name clashes.

use crate::database::VuforiaDatabase;
use crate::errors::{Error, Result};
use crate::types::TargetId;
use crate::validators::RequestContext;
use axum::http::Method;
use serde_json::{Map, Value};

/// A target id in the path must name a not-deleted target of the matched
/// database.
pub fn validate_target_id_exists(
    ctx: &RequestContext<'_>,
    database: &VuforiaDatabase,
) -> Result<()> {
    match ctx.path_target_id() {
        None => Ok(()),
        Some(id) => {
            let target_id = TargetId::from(id);
            database
                .find_target(&target_id)
                .map(|_| ())
                .ok_or(Error::UnknownTarget)
        }
    }
}

/// Inactive and suspended databases reject everything except plain reads.
/// Duplicate checks count as recognition work, so GET `/duplicates/…` is
/// rejected too.
pub fn validate_project_state(
    ctx: &RequestContext<'_>,
    database: &VuforiaDatabase,
) -> Result<()> {
    if database.state.accepts_requests() {
        return Ok(());
    }
    if *ctx.method == Method::GET && !ctx.path.starts_with("/duplicates") {
        return Ok(());
    }
    Err(Error::ProjectInactive)
}

/// Target names are unique among the not-deleted targets of a database. An
/// update keeping a target's own name is allowed.
pub fn validate_name_not_taken(
    ctx: &RequestContext<'_>,
    body: Option<&Map<String, Value>>,
    database: &VuforiaDatabase,
) -> Result<()> {
    let name = match body.and_then(|object| object.get("name")).and_then(Value::as_str) {
        None => return Ok(()),
        Some(name) => name,
    };
    let own_id = ctx.path_target_id();
    let taken = database
        .not_deleted_targets()
        .any(|t| t.name == name && Some(t.target_id.as_str()) != own_id);
    if taken {
        return Err(Error::TargetNameExist);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseState;
    use crate::target::Target;
    use axum::http::HeaderMap;
    use chrono::Utc;
    use serde_json::json;

    fn database(state: DatabaseState) -> VuforiaDatabase {
        let target = Target::new("kept".into(), 1.0, vec![1], true, None, Utc::now());
        let mut deleted = Target::new("gone".into(), 1.0, vec![2], true, None, Utc::now());
        deleted.delete_date = Some(Utc::now());
        VuforiaDatabase::builder()
            .database_name("db")
            .server_access_key("sa")
            .server_secret_key("ss")
            .client_access_key("ca")
            .client_secret_key("cs")
            .state(state)
            .targets(vec![target, deleted])
            .build()
    }

    fn ctx<'a>(method: &'a Method, path: &'a str, headers: &'a HeaderMap) -> RequestContext<'a> {
        RequestContext {
            headers,
            body: b"",
            method,
            path,
            now: Utc::now(),
        }
    }

    #[test]
    fn existing_target_id_passes_and_deleted_does_not() {
        let database = database(DatabaseState::Working);
        let kept_id = database.targets[0].target_id.to_string();
        let deleted_id = database.targets[1].target_id.to_string();
        let headers = HeaderMap::new();

        let kept_path = format!("/targets/{kept_id}");
        assert!(
            validate_target_id_exists(&ctx(&Method::GET, &kept_path, &headers), &database).is_ok()
        );

        let deleted_path = format!("/targets/{deleted_id}");
        assert!(matches!(
            validate_target_id_exists(&ctx(&Method::GET, &deleted_path, &headers), &database),
            Err(Error::UnknownTarget)
        ));

        assert!(
            validate_target_id_exists(&ctx(&Method::GET, "/targets", &headers), &database).is_ok()
        );
    }

    #[test]
    fn inactive_database_allows_plain_reads_only() {
        let headers = HeaderMap::new();
        for state in [DatabaseState::Inactive, DatabaseState::Suspended] {
            let database = database(state);
            assert!(
                validate_project_state(&ctx(&Method::GET, "/targets", &headers), &database).is_ok()
            );
            assert!(
                validate_project_state(&ctx(&Method::GET, "/summary", &headers), &database).is_ok()
            );
            assert!(matches!(
                validate_project_state(&ctx(&Method::GET, "/duplicates/abc", &headers), &database),
                Err(Error::ProjectInactive)
            ));
            assert!(matches!(
                validate_project_state(&ctx(&Method::POST, "/targets", &headers), &database),
                Err(Error::ProjectInactive)
            ));
            assert!(matches!(
                validate_project_state(&ctx(&Method::DELETE, "/targets/abc", &headers), &database),
                Err(Error::ProjectInactive)
            ));
        }
    }

    #[test]
    fn working_database_accepts_everything() {
        let headers = HeaderMap::new();
        let database = database(DatabaseState::Working);
        assert!(
            validate_project_state(&ctx(&Method::POST, "/targets", &headers), &database).is_ok()
        );
        assert!(validate_project_state(
            &ctx(&Method::GET, "/duplicates/abc", &headers),
            &database
        )
        .is_ok());
    }

    #[test]
    fn clashing_name_is_rejected_but_own_name_is_kept() {
        let database = database(DatabaseState::Working);
        let own_id = database.targets[0].target_id.to_string();
        let headers = HeaderMap::new();
        let body = json!({"name": "kept"}).as_object().unwrap().clone();

        assert!(matches!(
            validate_name_not_taken(
                &ctx(&Method::POST, "/targets", &headers),
                Some(&body),
                &database
            ),
            Err(Error::TargetNameExist)
        ));

        let own_path = format!("/targets/{own_id}");
        assert!(validate_name_not_taken(
            &ctx(&Method::PUT, &own_path, &headers),
            Some(&body),
            &database
        )
        .is_ok());
    }

    #[test]
    fn deleted_targets_do_not_reserve_their_name() {
        let database = database(DatabaseState::Working);
        let headers = HeaderMap::new();
        let body = json!({"name": "gone"}).as_object().unwrap().clone();
        assert!(validate_name_not_taken(
            &ctx(&Method::POST, "/targets", &headers),
            Some(&body),
            &database
        )
        .is_ok());
    }
}

use std::time::Duration;

use pretty_assertions::assert_eq;

use crate::{
    error::{Error, ErrorKind},
    test::util::{credentials, FakeConnector, AUTHENTICATION_DATABASE_NAME, DATABASE_NAME},
    Client,
    CredentialResolver,
    DatabaseTemplate,
    ServerVersion,
};

#[tokio::test]
async fn execute_runs_callback_inside_session() {
    let connector = FakeConnector::new();
    let template = DatabaseTemplate::new(Client::new(connector.clone()), DATABASE_NAME);

    let name = template
        .execute(|db| async move {
            assert!(!db.is_authenticated());
            Ok(db.name().to_string())
        })
        .await
        .unwrap();

    assert_eq!(name, DATABASE_NAME);
    assert_eq!(connector.sessions_started(), 1);
    assert_eq!(connector.open_sessions(), 0);
}

#[tokio::test]
async fn execute_ends_session_on_error() {
    let connector = FakeConnector::new();
    let template = DatabaseTemplate::new(Client::new(connector.clone()), DATABASE_NAME);

    let error = template
        .execute(|_db| async move { Err::<(), _>(Error::connectivity_error("socket closed")) })
        .await
        .unwrap_err();

    assert!(error.is_network_error());
    assert_eq!(connector.sessions_started(), 1);
    assert_eq!(connector.open_sessions(), 0);
}

#[tokio::test]
async fn execute_ends_session_on_cancellation() {
    let connector = FakeConnector::new();
    let template = DatabaseTemplate::new(Client::new(connector.clone()), DATABASE_NAME);

    let timed_out = tokio::time::timeout(
        Duration::from_millis(20),
        template.execute(|_db| async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }),
    )
    .await;

    assert!(timed_out.is_err());
    assert_eq!(connector.sessions_started(), 1);
    assert_eq!(connector.open_sessions(), 0);
}

#[tokio::test]
async fn execute_with_credential_shares_resolver_cache() {
    let connector = FakeConnector::new();
    connector.add_user(AUTHENTICATION_DATABASE_NAME, "admin", "admin");
    let client = Client::new(connector.clone());
    let resolver = CredentialResolver::new();

    let template = DatabaseTemplate::builder()
        .client(client.clone())
        .database_name(DATABASE_NAME)
        .credential(credentials())
        .auth_database(AUTHENTICATION_DATABASE_NAME)
        .resolver(resolver.clone())
        .build();

    for _ in 0..3 {
        let source = template
            .execute(|db| async move { Ok(db.auth_source().map(str::to_string)) })
            .await
            .unwrap();
        assert_eq!(source.as_deref(), Some(AUTHENTICATION_DATABASE_NAME));
    }

    let resolved = resolver
        .resolve_with_auth_db(
            &client,
            DATABASE_NAME,
            &credentials(),
            AUTHENTICATION_DATABASE_NAME,
        )
        .await
        .unwrap();
    assert!(resolved.ptr_eq(&template.database().await.unwrap()));
    assert_eq!(connector.auth_attempts(), 1);
    assert_eq!(connector.sessions_started(), 3);
}

#[tokio::test]
async fn failed_authentication_starts_no_session() {
    let connector = FakeConnector::new();
    let template = DatabaseTemplate::builder()
        .client(Client::new(connector.clone()))
        .database_name(DATABASE_NAME)
        .credential(credentials())
        .build();

    let error = template
        .execute(|_db| async move { Ok(()) })
        .await
        .unwrap_err();

    assert!(error.is_auth_error());
    assert_eq!(connector.sessions_started(), 0);
}

#[tokio::test]
async fn seeds_user_then_drops_database() {
    let connector = FakeConnector::new();
    let client = Client::new(connector.clone());
    let template = DatabaseTemplate::new(client.clone(), DATABASE_NAME);

    let version = template.server_version().await.unwrap();
    assert_eq!(version, ServerVersion::new(3, 6, 8));
    assert!(!version.is_at_least(4, 0));

    template
        .execute(|db| async move {
            db.sister(AUTHENTICATION_DATABASE_NAME)
                .create_user("admin", "admin")
                .await
        })
        .await
        .unwrap();

    let db = CredentialResolver::new()
        .resolve_with_auth_db(
            &client,
            DATABASE_NAME,
            &credentials(),
            AUTHENTICATION_DATABASE_NAME,
        )
        .await
        .unwrap();
    assert!(db.is_authenticated());

    template.drop_database().await.unwrap();
    assert_eq!(connector.dropped_databases(), vec![DATABASE_NAME.to_string()]);
}

#[tokio::test]
async fn unparsable_version_is_reported() {
    let connector = FakeConnector::new();
    connector.set_version("not-a-version");
    let template = DatabaseTemplate::new(Client::new(connector), DATABASE_NAME);

    let error = template.server_version().await.unwrap_err();
    assert!(matches!(*error.kind, ErrorKind::InvalidResponse { .. }));
}

#[tokio::test]
async fn shut_down_client_rejects_callbacks() {
    let connector = FakeConnector::new();
    let client = Client::new(connector.clone());
    let template = DatabaseTemplate::new(client.clone(), DATABASE_NAME);

    client.shutdown().await;

    let error = template
        .execute(|_db| async move { Ok(()) })
        .await
        .unwrap_err();
    assert!(error.is_shutdown());
    assert!(template.server_version().await.unwrap_err().is_shutdown());
    assert_eq!(connector.sessions_started(), 0);
}

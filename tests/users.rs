mod fixtures;
mod utils;

use fixtures::fake_user;
use utils::AnyHow;

use marketplace::users::service::{UserError, UserQuery, UserService};

#[async_std::test]
async fn registration_issues_a_token() -> Result<(), AnyHow> {
    let (users, _catalog, _engagement) = utils::services().await?;

    let payload = fake_user();
    let registered = users.create(&payload).await?;
    assert_eq!(registered.user.phone, payload.phone);
    assert_eq!(registered.token.len(), 64);

    let resolved = users.find_by_token(&registered.token).await?;
    assert_eq!(resolved.map(|u| u.id), Some(registered.user.id));
    Ok(())
}

#[async_std::test]
async fn unknown_token_resolves_to_nothing() -> Result<(), AnyHow> {
    let (users, _catalog, _engagement) = utils::services().await?;

    let resolved = users.find_by_token("deadbeef").await?;
    assert!(resolved.is_none());
    Ok(())
}

#[async_std::test]
async fn duplicate_phone_and_email_are_rejected() -> Result<(), AnyHow> {
    let (users, _catalog, _engagement) = utils::services().await?;

    let payload = fake_user();
    users.create(&payload).await?;

    let mut same_phone = fake_user();
    same_phone.phone = payload.phone.clone();
    let result = users.create(&same_phone).await;
    assert_eq!(result.unwrap_err(), UserError::DuplicateIdentity("phone".into()));

    let mut same_email = fake_user();
    same_email.email = payload.email.clone();
    let result = users.create(&same_email).await;
    assert_eq!(result.unwrap_err(), UserError::DuplicateIdentity("email".into()));
    Ok(())
}

#[async_std::test]
async fn update_and_delete_roundtrip() -> Result<(), AnyHow> {
    let (users, _catalog, _engagement) = utils::services().await?;

    let registered = users.create(&fake_user()).await?;
    let mut changed = fake_user();
    changed.first_name = "Changed".into();

    let updated = users.update(registered.user.id, &changed).await?;
    assert_eq!(updated.first_name, "Changed");

    users.delete(registered.user.id).await?;
    let missing = users.read(registered.user.id).await;
    assert!(matches!(missing.unwrap_err(), UserError::UserNotFound(_)));

    // The token dies with the account.
    assert!(users.find_by_token(&registered.token).await?.is_none());
    Ok(())
}

#[async_std::test]
async fn list_searches_across_identity_fields() -> Result<(), AnyHow> {
    let (users, _catalog, _engagement) = utils::services().await?;

    let mut ada = fake_user();
    ada.first_name = "Zyxarina".into();
    users.create(&ada).await?;
    users.create(&fake_user()).await?;

    let mut query = UserQuery::default();
    query.options.search = Some("zyxarina".into());
    let found = users.list(&query).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "Zyxarina");
    Ok(())
}

//! Integration tests for document newtypes and address ownership.

use prato_core::{AccountId, AddressOwner, Cnpj, Cpf, Phone, StoreId, Uf, ZipCode};

// =============================================================================
// Document Formats
// =============================================================================

#[test]
fn test_cpf_accepts_both_forms() {
    let bare = Cpf::parse("52998224725").expect("valid");
    let formatted = Cpf::parse("529.982.247-25").expect("valid");
    assert_eq!(bare, formatted);
    assert_eq!(bare.formatted(), "529.982.247-25");
}

#[test]
fn test_cnpj_accepts_both_forms() {
    let bare = Cnpj::parse("11222333000181").expect("valid");
    let formatted = Cnpj::parse("11.222.333/0001-81").expect("valid");
    assert_eq!(bare, formatted);
    assert_eq!(bare.formatted(), "11.222.333/0001-81");
}

#[test]
fn test_phone_is_thirteen_digits() {
    let phone = Phone::parse("5511987654321").expect("valid");
    assert_eq!(phone.formatted(), "+55 (11) 98765-4321");
    assert!(Phone::parse("11987654321").is_err());
}

#[test]
fn test_zip_code_is_eight_digits() {
    let cep = ZipCode::parse("01310-100").expect("valid");
    assert_eq!(cep.as_str(), "01310100");
    assert!(ZipCode::parse("0131010").is_err());
    assert!(ZipCode::parse("01310-10a").is_err());
}

#[test]
fn test_uf_normalizes_to_uppercase() {
    assert_eq!(Uf::parse("sp").expect("valid").as_str(), "SP");
    assert!(Uf::parse("São").is_err());
}

#[test]
fn test_documents_serialize_as_bare_digits() {
    let cpf = Cpf::parse("529.982.247-25").expect("valid");
    assert_eq!(
        serde_json::to_string(&cpf).expect("serialize"),
        "\"52998224725\""
    );
}

// =============================================================================
// Address Ownership
// =============================================================================

#[test]
fn test_owner_is_account_xor_store() {
    let account_owned = AddressOwner::Account(AccountId::new(1));
    assert!(account_owned.account_id().is_some());
    assert!(account_owned.store_id().is_none());

    let store_owned = AddressOwner::Store(StoreId::new(9));
    assert!(store_owned.account_id().is_none());
    assert!(store_owned.store_id().is_some());
}

#[test]
fn test_owner_column_roundtrip() {
    for owner in [
        AddressOwner::Account(AccountId::new(3)),
        AddressOwner::Store(StoreId::new(7)),
    ] {
        let (account_id, store_id) = owner.as_columns();
        assert_eq!(AddressOwner::from_columns(account_id, store_id), Some(owner));
    }
}

#[test]
fn test_illegal_owner_columns_are_unrepresentable() {
    // Both set or both null can never reassemble into an owner.
    assert_eq!(AddressOwner::from_columns(None, None), None);
    assert_eq!(
        AddressOwner::from_columns(Some(AccountId::new(1)), Some(StoreId::new(1))),
        None
    );
}

#[test]
fn test_owner_scopes_are_disjoint() {
    // The same numeric id under different owners is a different scope.
    let account_scope = AddressOwner::Account(AccountId::new(5));
    let store_scope = AddressOwner::Store(StoreId::new(5));
    assert_ne!(account_scope, store_scope);
}

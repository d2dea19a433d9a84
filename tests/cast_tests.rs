use erased_any::{
    any_cast, any_cast_into, any_cast_mut, any_cast_ref, any_cast_ref_mut, any_cast_value,
    as_cref, as_ref, try_any_cast_mut, try_any_cast_ref, type_id, Any, CastError, MoveOnly,
};

#[test]
fn test_any_cast() {
    let mut any = Any::new(42);

    assert_eq!(any_cast::<char>(&any), None);
    assert_eq!(any_cast_mut::<char>(&mut any), None);
    assert_eq!(any_cast::<i32>(&any), Some(&42));
    assert_eq!(any_cast_mut::<i32>(&mut any), Some(&mut 42));
    assert_eq!(*any_cast_ref::<i32>(&any), 42);
    assert_eq!(*any_cast_ref_mut::<i32>(&mut any), 42);
    assert_eq!(any_cast_value::<i32>(&any), 42);
    assert_eq!(any_cast_into::<i32>(Any::new(42)), 42);
}

#[test]
fn test_cast_is_exact() {
    let any = Any::new(1u32);

    assert!(any_cast::<i32>(&any).is_none());
    assert!(any_cast::<u64>(&any).is_none());
    assert!(any_cast::<&u32>(&any).is_none());
    assert!(any_cast::<()>(&any).is_none());
}

#[test]
fn test_cast_into_moves_owned_values() {
    #[derive(Clone, PartialEq)]
    struct Buffer(Vec<u8>);

    let any = Any::new(Buffer(vec![1, 2, 3]));
    let address = any_cast::<Buffer>(&any).map(|b| b.0.as_ptr());

    let value = any_cast_into::<Buffer>(any);

    // moved rather than cloned, so the vector keeps its allocation
    assert_eq!(Some(value.0.as_ptr()), address);
    assert_eq!(value.0, vec![1, 2, 3]);
}

#[test]
fn test_cast_into_copies_aliased_values() {
    let value = vec![1, 2];
    let alias = unsafe { Any::from_ref(&value) };

    assert_eq!(any_cast_into::<Vec<i32>>(alias), vec![1, 2]);
    assert_eq!(value, vec![1, 2]);
}

#[test]
fn test_downcast_of_move_only_value() {
    #[derive(Debug, PartialEq)]
    struct Token(u64);

    let any = Any::new_with(Token(5), MoveOnly);
    let any = any.downcast::<u64>().unwrap_err();

    assert_eq!(any.downcast::<Token>().ok(), Some(Token(5)));
}

#[test]
fn test_downcast_refuses_aliases() {
    let mut value = 3u8;
    let alias = unsafe { Any::from_mut(&mut value) };

    let alias = alias.downcast::<u8>().unwrap_err();
    assert!(alias.has_value());
}

#[test]
fn test_try_casts() {
    let mut any = Any::new(2.5f64);

    assert_eq!(try_any_cast_ref::<f64>(&any), Ok(&2.5));
    assert_eq!(
        try_any_cast_mut::<f32>(&mut any),
        Err(CastError::TypeMismatch {
            expected: type_id::<f32>(),
            found: type_id::<f64>(),
        })
    );

    let err = try_any_cast_ref::<i8>(&Any::empty()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot cast an empty container");
}

#[test]
fn test_error_messages() {
    let mismatch = CastError::TypeMismatch {
        expected: type_id::<u8>(),
        found: type_id::<u16>(),
    };
    assert_eq!(mismatch.to_string(), "Type mismatch: expected u8, found u16");

    let alias = CastError::ConstAlias(type_id::<u8>());
    assert_eq!(alias.to_string(), "Cannot borrow u8 mutably through a const alias");
}

#[test]
fn test_const_alias_allows_shared_access() {
    let mut any = Any::new(42);
    let alias = unsafe { as_cref(&any) };

    assert_eq!(*any_cast_ref::<i32>(&alias), 42);
    assert_eq!(any_cast::<i32>(&alias).map(|v| v as *const i32 as *const ()), Some(any.data()));
    assert!(any_cast_mut::<i32>(&mut any).is_some());
}

#[test]
#[should_panic(expected = "Cannot borrow")]
fn test_mutable_cast_of_const_alias_panics() {
    let any = Any::new(42);
    let mut alias = unsafe { as_cref(&any) };

    any_cast_ref_mut::<i32>(&mut alias);
}

#[test]
#[should_panic(expected = "Cannot borrow")]
fn test_const_alias_of_alias_stays_const() {
    let value = 42;
    let mut alias = unsafe { Any::from_ref(&value) };
    let mut again = unsafe { as_ref(&mut alias) };

    any_cast_ref_mut::<i32>(&mut again);
}

#[test]
#[should_panic(expected = "Type mismatch")]
fn test_reference_cast_mismatch_panics() {
    let any = Any::new(42);
    any_cast_ref::<u32>(&any);
}

#[test]
#[should_panic(expected = "Type mismatch")]
fn test_value_cast_mismatch_panics() {
    let any = Any::new(String::from("text"));
    any_cast_value::<&'static str>(&any);
}

#[test]
#[should_panic(expected = "Type mismatch")]
fn test_cast_into_mismatch_panics() {
    any_cast_into::<u8>(Any::new(1i8));
}

#[test]
#[should_panic(expected = "empty")]
fn test_cast_of_empty_panics() {
    any_cast_ref::<i32>(&Any::empty());
}

// src/any_tests.rs
#[cfg(test)]
mod tests {
    use crate::{any_cast, as_ref, Any, BasicAny, MoveOnly, Policy};
    use std::mem;

    #[derive(Debug, Clone, PartialEq)]
    struct Fat {
        value: [f64; 4],
    }

    fn within<const N: usize>(any: &BasicAny<N>, address: *const ()) -> bool {
        let start = any as *const BasicAny<N> as usize;
        let address = address as usize;
        address >= start && address < start + mem::size_of::<BasicAny<N>>()
    }

    #[test]
    fn test_small_values_live_inside_the_container() {
        let any = Any::new('c');

        assert!(Any::fits_inline::<char>());
        assert!(within(&any, any.data()));
    }

    #[test]
    fn test_large_values_are_boxed() {
        let any = Any::new(Fat { value: [0.1, 0.2, 0.3, 0.4] });

        assert!(!Any::fits_inline::<Fat>());
        assert!(!within(&any, any.data()));
    }

    #[test]
    fn test_moving_a_boxed_value_keeps_its_address() {
        let mut any = Any::new(Fat { value: [1.0; 4] });
        let before = any.data();

        let moved = any.take();

        assert_eq!(moved.data(), before);
        assert!(any.data().is_null());
    }

    #[test]
    fn test_moving_an_inline_value_relocates_it() {
        let mut any = Any::new(5u64);
        let moved = any.take();

        assert!(within(&moved, moved.data()));
        assert_eq!(any_cast::<u64>(&moved), Some(&5));
    }

    #[test]
    fn test_copies_mirror_the_storage_mode() {
        let small = Any::new(1u8);
        let large = Any::new(Fat { value: [2.0; 4] });

        let small_copy = small.clone();
        let large_copy = large.clone();

        assert!(within(&small_copy, small_copy.data()));
        assert!(!within(&large_copy, large_copy.data()));
        assert_ne!(large_copy.data(), large.data());
    }

    #[test]
    fn test_aliasing_an_inline_owner_moves_its_value_out() {
        let mut owner = Any::new(42i32);
        assert!(within(&owner, owner.data()));

        let alias = unsafe { as_ref(&mut owner) };

        assert_eq!(alias.policy(), Policy::Ref);
        assert_eq!(alias.data(), owner.data());
        assert!(!within(&owner, alias.data()));

        // the box travels with the owner, the alias still points at it
        let moved = owner.take();
        assert_eq!(moved.data(), alias.data());
        assert_eq!(any_cast::<i32>(&alias), Some(&42));
    }

    #[test]
    fn test_forced_box_ignores_size() {
        let mut any = Any::new_boxed(1u8);
        let address = any.data();

        assert!(!within(&any, address));
        let copy = any.clone();
        assert!(!within(&copy, copy.data()));
        assert_ne!(copy.data(), address);

        let moved = any.take();
        assert_eq!(moved.data(), address);

        // emplacing goes back to the usual placement
        let mut any = moved;
        any.emplace(2u8);
        assert!(within(&any, any.data()));
    }

    #[test]
    fn test_move_only_values_follow_the_same_rule() {
        #[derive(PartialEq)]
        struct Payload<const S: usize>([f64; S]);

        let small = Any::new_with(Payload([0.0; 1]), MoveOnly);
        let large = Any::new_with(Payload([0.0; 4]), MoveOnly);

        assert!(within(&small, small.data()));
        assert!(!within(&large, large.data()));
    }
}

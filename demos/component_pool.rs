//! Demonstrates using Any as the building block of a small component pool.
//!
//! Each entity owns one container per component type. Components are stored
//! by value, so cloning an entity clones its components, and systems reach
//! them through exact casts.
//!
//! Run with: cargo run --example component_pool

use erased_any::{any_cast, any_cast_value, as_cref, Any, CastError, MoveOnly, TypeInfo};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct Name(String);

// A handle to something outside the pool; it can move but never be duplicated
#[derive(Debug, PartialEq)]
struct SocketHandle(u32);

#[derive(Default)]
struct Entity {
    components: HashMap<TypeInfo, Any>,
}

impl Entity {
    fn insert(&mut self, component: Any) {
        self.components.insert(component.type_info(), component);
    }

    fn get<T: 'static>(&self) -> Result<&T, CastError> {
        self.component::<T>()?.try_downcast_ref::<T>()
    }

    fn get_mut<T: 'static>(&mut self) -> Result<&mut T, CastError> {
        self.components
            .get_mut(&TypeInfo::of::<T>())
            .ok_or(CastError::Empty)?
            .try_downcast_mut::<T>()
    }

    fn component<T: 'static>(&self) -> Result<&Any, CastError> {
        self.components
            .get(&TypeInfo::of::<T>())
            .ok_or(CastError::Empty)
    }

    fn remove<T: 'static>(&mut self) -> Option<T> {
        self.components
            .remove(&TypeInfo::of::<T>())
            .and_then(|any| any.downcast::<T>().ok())
    }

    fn duplicate(&self) -> Entity {
        let components = self
            .components
            .iter()
            .map(|(info, any)| (*info, any.clone()))
            .filter(|(_, any)| any.has_value())
            .collect();
        Entity { components }
    }
}

fn main() -> Result<(), CastError> {
    let mut player = Entity::default();
    player.insert(Any::new(Position { x: 0.0, y: 0.0 }));
    player.insert(Any::new(Velocity { dx: 1.5, dy: -0.5 }));
    player.insert(Any::new(Name("player".to_string())));
    player.insert(Any::new_with(SocketHandle(9), MoveOnly));

    println!("Player components:");
    for (info, any) in &player.components {
        println!("  {} ({:?})", info, any.policy());
    }
    println!("Position fits inline: {}", Any::fits_inline::<Position>());
    println!("Name fits inline: {}", Any::fits_inline::<Name>());

    // Movement system
    for _ in 0..3 {
        let velocity = *player.get::<Velocity>()?;
        let position = player.get_mut::<Position>()?;
        position.x += velocity.dx;
        position.y += velocity.dy;
    }
    println!("\nPosition after 3 steps: {:?}", player.get::<Position>()?);

    // Read-only view handed to a renderer; it must not outlive the entity
    {
        let view = unsafe { as_cref(player.component::<Position>()?) };
        println!("Renderer sees: {:?}", any_cast::<Position>(&view));
    }

    // Cloning skips the socket, which cannot be copied
    let mut ghost = player.duplicate();
    ghost.get_mut::<Name>()?.0.push_str("-ghost");
    println!("\nGhost has {} components", ghost.components.len());
    println!("Ghost name: {}", ghost.get::<Name>()?.0);
    println!("Player name: {}", player.get::<Name>()?.0);

    // Wrong type requests are reported, not silently converted
    if let Err(e) = player.component::<Position>()?.try_downcast_ref::<Velocity>() {
        println!("\nExpected error: {}", e);
    }

    let socket = player.remove::<SocketHandle>();
    println!("\nReleased socket: {:?}", socket);
    println!("Player has socket: {}", player.get::<SocketHandle>().is_ok());

    let name = player
        .component::<Name>()
        .map(|any| any_cast_value::<Name>(any))?;
    println!("Still named: {}", name.0);

    Ok(())
}

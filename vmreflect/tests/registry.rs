use std::{ptr, sync::Arc};

use vmreflect::vmobject::{
    Class, ClassHandle, FieldKind, IntWidth, ObjectPtr, StaticClass, ViewModel, declare_class,
    view_model_class,
};
use vmreflect::{
    PropertyAccess, PropertyFlags, PropertyOperations, all_properties, bind_view_model,
    find_property, registry, view_model_enum, view_model_properties, view_model_struct,
};

pub struct Player {
    health: i32,
    nickname: Option<String>,
}

impl Player {
    fn health(&self) -> i32 {
        self.health
    }

    fn set_health(&mut self, health: i32) {
        self.health = health;
    }

    fn nickname(&self) -> Option<String> {
        self.nickname.clone()
    }
}

view_model_class!(Player as "Player");

view_model_properties! {
    Player {
        static HEALTH: i32 = "Health" {
            get: Player::health,
            set: Player::set_health,
            field: health,
        };
        static NICKNAME: Option<String> = "Nickname" { get: Player::nickname };
    }
}

pub struct Base {
    x: u8,
}

pub struct Derived {
    base: Base,
    x: String,
}

view_model_class!(Base as "Base");
view_model_class!(Derived as "Derived", extends Base => base);

view_model_properties! {
    Base {
        static BASE_X: u8 = "X" { field: x };
    }
    Derived {
        static DERIVED_X: String = "X" { field: x };
    }
}

pub struct Empty;
view_model_class!(Empty as "Empty");

pub struct Unregistered {
    inner: Empty,
}
view_model_class!(Unregistered as "Unregistered", extends Empty => inner);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rarity {
    Common,
    Epic = 7,
}
view_model_enum!(Rarity { Common, Epic });

#[derive(Clone, Debug, PartialEq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}
view_model_struct!(Color);

pub struct Item {
    rarity: Rarity,
    tint: Color,
    owner: ObjectPtr<Player>,
    tags: Vec<String>,
    secret: u64,
}

impl Item {
    fn set_rarity(&mut self, rarity: Rarity) {
        self.rarity = rarity;
    }

    fn set_secret(&mut self, secret: u64) {
        self.secret = secret;
    }

    fn tag_count(&self) -> u32 {
        self.tags.len() as u32
    }
}

view_model_class!(Item as "Item");

view_model_properties! {
    Item {
        static RARITY: Rarity = "Rarity" { field: rarity, set: Item::set_rarity };
        static TINT: Color = "Tint" { field: tint };
        static OWNER: ObjectPtr<Player> = "Owner" { field: owner };
        static TAGS: Vec<String> = "Tags" { field: tags };
        static SECRET: u64 = "Secret" {
            field: secret,
            private_set: Item::set_secret,
            dynamic: false,
        };
        static TAG_COUNT: u32 = "TagCount" { get: Item::tag_count };
    }
}

pub struct HealthBar;
pub struct BossHealthBar;
declare_class!(HealthBar as "HealthBar");
declare_class!(BossHealthBar as "BossHealthBar", extends HealthBar);
bind_view_model!(HealthBar => Player);

fn player() -> Player {
    Player {
        health: 80,
        nickname: None,
    }
}

fn item() -> Item {
    Item {
        rarity: Rarity::Common,
        tint: Color { r: 1, g: 2, b: 3 },
        owner: ObjectPtr::null(),
        tags: vec!["sword".to_string(), "cursed".to_string()],
        secret: 42,
    }
}

#[test]
fn player_declares_health_and_nickname() {
    let health = find_property(Player::static_class(), "Health").expect("health is declared");
    assert_eq!(
        health.flags(),
        PropertyFlags::HAS_PUBLIC_SETTER | PropertyFlags::AVAILABLE_FOR_DYNAMIC_LOOKUP
    );
    assert_eq!(health.field_offset(), Some(core::mem::offset_of!(Player, health)));

    let nickname = find_property(Player::static_class(), "Nickname").expect("nickname is declared");
    assert_eq!(
        nickname.flags(),
        PropertyFlags::IS_OPTIONAL | PropertyFlags::AVAILABLE_FOR_DYNAMIC_LOOKUP
    );
    assert_eq!(nickname.field_offset(), None);

    let declared: Vec<_> = registry()
        .declared_properties(Player::static_class())
        .iter()
        .map(|property| property.name())
        .collect();
    assert_eq!(declared, ["Health", "Nickname"]);
}

#[test]
fn erased_read_agrees_with_typed_getter() {
    let mut player = player();
    let health = find_property(Player::static_class(), "Health").unwrap();

    let mut out = 0i32;
    assert!(health.get_decayed_value(&player, &mut out));
    assert_eq!(out, HEALTH.get_value(&player));

    health.set_decayed_value(&mut player, &55i32, true).unwrap();
    assert_eq!(player.health, 55);
    assert!(health.get_decayed_value(&player, &mut out));
    assert_eq!(out, 55);
}

#[test]
fn optional_read_reports_presence() {
    let mut player = player();
    let nickname = find_property(Player::static_class(), "Nickname").unwrap();

    let mut out = String::from("untouched");
    assert!(!nickname.get_decayed_value(&player, &mut out));
    assert_eq!(out, "untouched");

    player.nickname = Some("Ace".to_string());
    assert!(nickname.get_decayed_value(&player, &mut out));
    assert_eq!(out, "Ace");

    let err = nickname
        .set_decayed_value(&mut player, &"Bob".to_string(), true)
        .unwrap_err();
    assert!(err.is_no_public_setter());
    assert_eq!(NICKNAME.get_value(&player).as_deref(), Some("Ace"));
}

#[test]
fn derived_declaration_shadows_base() {
    let on_derived = find_property(Derived::static_class(), "X").unwrap();
    assert_eq!(on_derived.owner(), Derived::static_class());
    assert_eq!(on_derived.operations().field_kind(), FieldKind::Str);

    let on_base = find_property(Base::static_class(), "X").unwrap();
    assert_eq!(on_base.owner(), Base::static_class());

    let derived = Derived {
        base: Base { x: 9 },
        x: "derived".to_string(),
    };
    let mut text = String::new();
    assert!(on_derived.get_decayed_value(&derived, &mut text));
    assert_eq!(text, "derived");

    let mut byte = 0u8;
    assert!(on_base.get_decayed_value(&derived, &mut byte), "base reads through the embedded base");
    assert_eq!(byte, 9);
    assert_eq!(BASE_X.get_value(&derived.base), 9);
    assert_eq!(DERIVED_X.get_value(&derived), "derived");
}

#[test]
fn undeclared_lookups_find_nothing() {
    assert!(find_property(Empty::static_class(), "Health").is_none());
    assert!(find_property(Unregistered::static_class(), "Anything").is_none());
    assert!(find_property(Player::static_class(), "Mana").is_none());
    assert!(registry().declared_properties(Empty::static_class()).is_empty());
}

#[test]
fn all_properties_is_reference_stable() {
    let first = all_properties();
    let second = all_properties();
    assert!(ptr::eq(first, second));

    let first_health = &first[&Player::static_class()][0];
    let second_health = &second[&Player::static_class()][0];
    assert!(ptr::addr_eq(
        first_health.operations() as *const dyn PropertyOperations,
        second_health.operations() as *const dyn PropertyOperations
    ));
    assert!(ptr::addr_eq(
        first_health.operations() as *const dyn PropertyOperations,
        &HEALTH as *const _
    ));
}

#[test]
fn native_registration_follows_value_kind() {
    static NATIVE_ITEM: Class = Class::new("NativeItem", None);
    let native = ClassHandle::new(&NATIVE_ITEM);

    for property in registry().declared_properties(Item::static_class()) {
        property.add_class_property(native);
    }

    let kinds: Vec<_> = native
        .fields()
        .iter()
        .map(|field| (field.name().to_string(), field.kind().clone()))
        .collect();
    assert_eq!(kinds.len(), 5, "the computed tag count attaches nothing");
    assert_eq!(
        kinds[0],
        (
            "Rarity".to_string(),
            FieldKind::Enum(<Rarity as vmreflect::ReflectedEnum>::ENUM_TYPE)
        )
    );
    assert_eq!(kinds[1].1, FieldKind::Struct(<Color as vmreflect::ReflectedStruct>::STRUCT_TYPE));
    assert_eq!(kinds[2].1, FieldKind::Object(Player::static_class()));
    assert_eq!(kinds[3].1, FieldKind::Array(Box::new(FieldKind::Str)));
    assert_eq!(kinds[4].1, FieldKind::Int(IntWidth::U64));

    let secret = native.find_field("Secret").unwrap();
    assert_eq!(secret.offset(), core::mem::offset_of!(Item, secret));
}

#[test]
fn hidden_properties_stay_typed_only() {
    let mut item = item();
    let secret = find_property(Item::static_class(), "Secret").unwrap();
    assert!(!secret.flags().is_available_for_dynamic_lookup());
    assert!(
        registry()
            .resolve_property(Item::static_class(), "Secret", PropertyAccess::Get)
            .unwrap_err()
            .is_not_available_for_dynamic_lookup()
    );

    SECRET.set_value(&mut item, 7).unwrap();
    assert_eq!(item.secret, 7);
    assert!(secret.set_decayed_value(&mut item, &1u64, true).unwrap_err().is_no_public_setter());
}

#[test]
fn user_values_round_through_erased_slots() {
    let mut item = item();
    let shared = Arc::new(player());
    item.owner = ObjectPtr::new(shared.clone());

    let rarity = find_property(Item::static_class(), "Rarity").unwrap();
    rarity.set_decayed_value(&mut item, &Rarity::Epic, true).unwrap();
    assert_eq!(RARITY.get_value(&item), Rarity::Epic);

    let mut tint = Color { r: 0, g: 0, b: 0 };
    let tint_property = find_property(Item::static_class(), "Tint").unwrap();
    assert!(tint_property.get_decayed_value(&item, &mut tint));
    assert_eq!(tint, Color { r: 1, g: 2, b: 3 });

    let mut owner = ObjectPtr::<Player>::null();
    let owner_property = find_property(Item::static_class(), "Owner").unwrap();
    assert!(owner_property.get_decayed_value(&item, &mut owner));
    assert_eq!(owner, ObjectPtr::new(shared));

    let mut count = 0u32;
    let count_property = find_property(Item::static_class(), "TagCount").unwrap();
    assert!(count_property.get_decayed_value(&item, &mut count));
    assert_eq!(count, 2);
    assert_eq!(TAGS.get_value(&item).len(), 2);
    assert!(OWNER.get_value(&item).get().is_some());
    assert_eq!(TINT.get_value(&item).r, 1);
    assert_eq!(TAG_COUNT.get_value(&item), 2);
}

#[test]
fn view_binding_resolves_through_subclasses() {
    let player_class = Some(Player::static_class());
    assert_eq!(vmreflect::view_model_class(HealthBar::static_class()), player_class);
    assert_eq!(vmreflect::view_model_class(BossHealthBar::static_class()), player_class);
    assert_eq!(vmreflect::view_model_class(Player::static_class()), None);
    assert!(registry().is_view_compatible(BossHealthBar::static_class(), Player::static_class()));
    assert!(!registry().is_view_compatible(BossHealthBar::static_class(), Item::static_class()));
}

#[test]
fn erased_owner_must_match() {
    let mut item = item();
    let health = find_property(Player::static_class(), "Health").unwrap();
    let erased: &mut dyn ViewModel = &mut item;
    let err = health.set_decayed_value(erased, &1i32, true).unwrap_err();
    assert!(err.is_owner_type_mismatch());
    assert_eq!(
        err.to_string(),
        "Property Player.Health cannot be accessed on an instance of `Item`"
    );
}

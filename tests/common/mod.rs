#![allow(dead_code)]

use std::sync::{Arc, OnceLock, Weak};
use wirebox::{Constructor, Injectable, InstantiateErrorKind, Method, Parameter, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderInfo {
    pub order_no: i64,
    pub user_info: UserInfo,
}

pub struct UserService {
    orders: OnceLock<Arc<OrderService>>,
}

impl UserService {
    pub fn user_info(&self, user_id: i64) -> UserInfo {
        UserInfo {
            user_id,
            username: format!("user{user_id}"),
        }
    }

    pub fn user_orders(&self, user_id: i64) -> Vec<OrderInfo> {
        self.orders.get().map(|orders| orders.user_order_list(user_id)).unwrap_or_default()
    }

    pub fn orders(&self) -> Option<&Arc<OrderService>> {
        self.orders.get()
    }
}

impl Injectable for UserService {
    const NAME: &'static str = "UserService";

    fn allocate() -> Self {
        Self { orders: OnceLock::new() }
    }

    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new([Parameter::class::<OrderService>("orders")], |this: &Self, args| {
            let _ = this.orders.set(args.object::<OrderService>(0)?);
            Ok(())
        }))
    }
}

/// Holds the user service weakly, the user service owns it
pub struct OrderService {
    users: OnceLock<Weak<UserService>>,
}

impl OrderService {
    pub fn users(&self) -> Option<Arc<UserService>> {
        self.users.get().and_then(Weak::upgrade)
    }

    pub fn order_info(&self, order_no: i64) -> Option<OrderInfo> {
        Some(OrderInfo {
            order_no,
            user_info: self.users()?.user_info(1),
        })
    }

    pub fn user_order_list(&self, _user_id: i64) -> Vec<OrderInfo> {
        (1..=3).filter_map(|order_no| self.order_info(order_no)).collect()
    }
}

impl Injectable for OrderService {
    const NAME: &'static str = "OrderService";

    fn allocate() -> Self {
        Self { users: OnceLock::new() }
    }

    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new([Parameter::class::<UserService>("users")], |this: &Self, args| {
            let _ = this.users.set(Arc::downgrade(&args.object::<UserService>(0)?));
            Ok(())
        }))
    }
}

pub struct Controller {
    users: OnceLock<Arc<UserService>>,
}

impl Controller {
    pub fn info(&self) -> Option<(UserInfo, Vec<OrderInfo>)> {
        let users = self.users.get()?;
        Some((users.user_info(1), users.user_orders(1)))
    }
}

impl Injectable for Controller {
    const NAME: &'static str = "Controller";

    fn allocate() -> Self {
        Self { users: OnceLock::new() }
    }

    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new([Parameter::class::<UserService>("users")], |this: &Self, args| {
            let _ = this.users.set(args.object::<UserService>(0)?);
            Ok(())
        }))
    }
}

/// Receives itself as the first constructor parameter
pub struct InjectSelf {
    this: OnceLock<Weak<InjectSelf>>,
    id: OnceLock<i64>,
}

impl InjectSelf {
    pub fn id(&self) -> i64 {
        self.id.get().copied().unwrap_or_default()
    }

    pub fn injected(&self) -> Option<Arc<InjectSelf>> {
        self.this.get().and_then(Weak::upgrade)
    }
}

impl Injectable for InjectSelf {
    const NAME: &'static str = "InjectSelf";

    fn allocate() -> Self {
        Self {
            this: OnceLock::new(),
            id: OnceLock::new(),
        }
    }

    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new(
            [Parameter::class::<InjectSelf>("this"), Parameter::scalar("id").with_default(1)],
            |this: &Self, args| {
                let _ = this.this.set(Arc::downgrade(&args.object::<InjectSelf>(0)?));
                let _ = this.id.set(args.int(1)?);
                Ok(())
            },
        ))
    }
}

pub struct Example {
    id: OnceLock<i64>,
}

impl Example {
    pub fn id(&self) -> i64 {
        self.id.get().copied().unwrap_or_default()
    }
}

impl Injectable for Example {
    const NAME: &'static str = "Example";

    fn allocate() -> Self {
        Self { id: OnceLock::new() }
    }

    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new([Parameter::scalar("id").with_default(1)], |this: &Self, args| {
            let _ = this.id.set(args.int(0)?);
            Ok(())
        }))
    }

    fn methods() -> Vec<Method<Self>> {
        vec![
            Method::new("test_invoke_method", [], |_: &Self, _| Ok(Value::from("test"))),
            Method::new("id", [Parameter::scalar("offset").with_default(0)], |this: &Self, args| {
                Ok(Value::Int(this.id() + args.int(0)?))
            }),
        ]
    }
}

/// Class without a constructor, fails in the instance creation hook if asked to
pub struct Plain;

impl Injectable for Plain {
    const NAME: &'static str = "Plain";

    fn allocate() -> Self {
        Self
    }

    fn instance_create(&self, arguments: &[Value]) -> Result<(), InstantiateErrorKind> {
        match arguments.first() {
            Some(Value::Str(reason)) => Err(InstantiateErrorKind::Custom(anyhow::anyhow!("{reason}"))),
            _ => Ok(()),
        }
    }
}

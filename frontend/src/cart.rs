//! 购物车
//!
//! 纯内存状态，不做持久化也没有结算流程。
//! 数量由重复出现的次数表示，分组展示时按首次加入的顺序排列。

use leptos::prelude::*;
use manaibay_shared::{EntityId, Product};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cart {
    items: Vec<Product>,
}

/// 分组后的一行：商品 + 数量
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: usize,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: Product) {
        tracing::debug!(id = %product.id, "added to cart");
        self.items.push(product);
    }

    /// 移除最近加入的一件；商品不在购物车中时返回 false
    pub fn remove_one(&mut self, id: &EntityId) -> bool {
        match self.items.iter().rposition(|p| &p.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// 件数（含重复）
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, id: &EntityId) -> usize {
        self.items.iter().filter(|p| &p.id == id).count()
    }

    pub fn lines(&self) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = Vec::new();
        for product in &self.items {
            match lines.iter_mut().find(|line| line.product.id == product.id) {
                Some(line) => line.quantity += 1,
                None => lines.push(CartLine {
                    product: product.clone(),
                    quantity: 1,
                }),
            }
        }
        lines
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(|p| p.price).sum()
    }
}

// =========================================================
// 组件层上下文
// =========================================================

pub fn provide_cart() -> RwSignal<Cart> {
    let cart = RwSignal::new(Cart::new());
    provide_context(cart);
    cart
}

pub fn use_cart() -> RwSignal<Cart> {
    use_context::<RwSignal<Cart>>().expect("Cart should be provided")
}

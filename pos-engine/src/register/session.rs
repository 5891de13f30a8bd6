use super::{CashCount, CutInput, RegisterError, compute_cut};
use crate::money::{round_money, validate_positive_amount};
use crate::orders::OrderBook;
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{
    CashMovement, CashMovementKind, CutKind, CutReport, PaymentMethod, PaymentMethodBreakdown,
    RegisterStatus,
};
use shared::types::Timestamp;
use shared::util::now_millis;
use std::collections::BTreeMap;

/// A sale taken while the register was open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub at: Timestamp,
}

/// One register session, from opening float to final cut
#[derive(Debug, Clone)]
pub struct CashRegister {
    status: RegisterStatus,
    opened_at: Timestamp,
    opening_float: Decimal,
    movements: Vec<CashMovement>,
    sales: Vec<Sale>,
    cuts: Vec<CutReport>,
}

impl CashRegister {
    /// Open the register with `opening_float` in the drawer
    pub fn open(opening_float: Decimal) -> Result<Self, RegisterError> {
        if opening_float.is_sign_negative() && !opening_float.is_zero() {
            return Err(RegisterError::InvalidAmount);
        }
        let opening_float = round_money(opening_float);
        crate::audit_log!("register_open", "register", opening_float.to_string());
        Ok(Self {
            status: RegisterStatus::Open,
            opened_at: now_millis(),
            opening_float,
            movements: Vec::new(),
            sales: Vec::new(),
            cuts: Vec::new(),
        })
    }

    pub fn status(&self) -> RegisterStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == RegisterStatus::Open
    }

    pub fn opened_at(&self) -> Timestamp {
        self.opened_at
    }

    pub fn opening_float(&self) -> Decimal {
        self.opening_float
    }

    pub fn movements(&self) -> &[CashMovement] {
        &self.movements
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    /// Cuts taken in this session, oldest first
    pub fn cuts(&self) -> &[CutReport] {
        &self.cuts
    }

    /// Put cash into the drawer; returns the new expected cash
    pub fn cash_in(&mut self, amount: Decimal, reason: &str) -> Result<Decimal, RegisterError> {
        self.movement(CashMovementKind::CashIn, amount, reason)
    }

    /// Take cash out of the drawer; cannot exceed what the drawer holds
    pub fn cash_out(&mut self, amount: Decimal, reason: &str) -> Result<Decimal, RegisterError> {
        self.movement(CashMovementKind::CashOut, amount, reason)
    }

    fn movement(
        &mut self,
        kind: CashMovementKind,
        amount: Decimal,
        reason: &str,
    ) -> Result<Decimal, RegisterError> {
        self.ensure_open()?;
        validate_positive_amount(amount).map_err(|_| RegisterError::InvalidAmount)?;
        validate_required_text(reason, "reason", MAX_NOTE_LEN)?;

        let amount = round_money(amount);
        if kind == CashMovementKind::CashOut {
            let available = self.expected_cash();
            if amount > available {
                return Err(RegisterError::InsufficientCash {
                    requested: amount,
                    available,
                });
            }
        }

        self.movements.push(CashMovement {
            kind,
            amount,
            reason: reason.trim().to_string(),
            at: now_millis(),
        });
        let action = match kind {
            CashMovementKind::CashIn => "cash_in",
            CashMovementKind::CashOut => "cash_out",
        };
        crate::audit_log!(action, "register", format!("{} ({})", amount, reason.trim()));
        Ok(self.expected_cash())
    }

    /// Record a paid order
    pub fn record_sale(
        &mut self,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<(), RegisterError> {
        self.ensure_open()?;
        validate_positive_amount(amount).map_err(|_| RegisterError::InvalidAmount)?;
        self.sales.push(Sale {
            method,
            amount: round_money(amount),
            at: now_millis(),
        });
        Ok(())
    }

    fn sum_movements(&self, kind: CashMovementKind) -> Decimal {
        self.movements
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.amount)
            .sum()
    }

    pub fn total_cash_in(&self) -> Decimal {
        self.sum_movements(CashMovementKind::CashIn)
    }

    pub fn total_cash_out(&self) -> Decimal {
        self.sum_movements(CashMovementKind::CashOut)
    }

    pub fn total_sales(&self) -> Decimal {
        self.sales.iter().map(|s| s.amount).sum()
    }

    pub fn cash_sales(&self) -> Decimal {
        self.sales
            .iter()
            .filter(|s| s.method == PaymentMethod::Cash)
            .map(|s| s.amount)
            .sum()
    }

    /// float + cash sales + cash in − cash out
    pub fn expected_cash(&self) -> Decimal {
        round_money(
            self.opening_float + self.cash_sales() + self.total_cash_in() - self.total_cash_out(),
        )
    }

    /// Sales grouped by payment method (cash, card, transfer order)
    pub fn sales_by_method(&self) -> Vec<PaymentMethodBreakdown> {
        let mut by_method: BTreeMap<PaymentMethod, (Decimal, u32)> = BTreeMap::new();
        for sale in &self.sales {
            let entry = by_method.entry(sale.method).or_insert((Decimal::ZERO, 0));
            entry.0 += sale.amount;
            entry.1 += 1;
        }
        by_method
            .into_iter()
            .map(|(method, (amount, count))| PaymentMethodBreakdown {
                method,
                amount: round_money(amount),
                count,
            })
            .collect()
    }

    /// Take a cut
    ///
    /// A partial cut (X) leaves the register open; a final cut (Z) closes it.
    /// Order counts come from `orders`: paid since the register opened, and
    /// still open.
    pub fn cut(
        &mut self,
        kind: CutKind,
        declared: CashCount,
        is_blind: bool,
        orders: &OrderBook,
    ) -> Result<CutReport, RegisterError> {
        self.ensure_open()?;

        let result = compute_cut(&CutInput {
            declared,
            expected_cash: self.expected_cash(),
            is_blind,
        });
        let generated_at = now_millis();
        let orders_closed = orders
            .list()
            .iter()
            .filter(|o| o.payment_date.is_some_and(|d| d >= self.opened_at))
            .count();
        let report = CutReport {
            kind,
            opened_at: self.opened_at,
            generated_at,
            opening_float: self.opening_float,
            cash_in: self.total_cash_in(),
            cash_out: self.total_cash_out(),
            total_sales: round_money(self.total_sales()),
            payments: self.sales_by_method(),
            orders_closed: u32::try_from(orders_closed).unwrap_or(u32::MAX),
            orders_open: u32::try_from(orders.open_orders().len()).unwrap_or(u32::MAX),
            result,
        };

        crate::audit_log!(
            "cut",
            "register",
            format!("{:?} declared={} blind={}", kind, report.result.total_amount, is_blind)
        );
        if let Some(difference) = report.result.difference
            && !difference.is_zero()
        {
            tracing::warn!(%difference, "Cash drawer does not match expected cash");
        }

        if kind == CutKind::Final {
            self.status = RegisterStatus::Closed;
            tracing::info!("Register closed");
        }
        self.cuts.push(report.clone());
        Ok(report)
    }

    fn ensure_open(&self) -> Result<(), RegisterError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(RegisterError::Closed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, MenuItemRef};
    use shared::models::OrderSource;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn count_of(value: &str, pieces: u32) -> CashCount {
        let mut count = CashCount::default();
        assert!(count.set(dec(value), pieces));
        count
    }

    fn register() -> CashRegister {
        CashRegister::open(dec("500")).unwrap()
    }

    #[test]
    fn test_expected_cash() {
        let mut reg = register();
        reg.record_sale(PaymentMethod::Cash, dec("120.50")).unwrap();
        reg.record_sale(PaymentMethod::Card, dec("300")).unwrap();
        assert_eq!(reg.cash_in(dec("200"), "Change fund").unwrap(), dec("820.50"));
        assert_eq!(reg.cash_out(dec("50"), "Ice delivery").unwrap(), dec("770.50"));

        assert_eq!(reg.expected_cash(), dec("770.50"));
        assert_eq!(reg.total_sales(), dec("420.50"));
        assert_eq!(reg.movements().len(), 2);
    }

    #[test]
    fn test_amount_must_be_positive() {
        let mut reg = register();
        assert_eq!(reg.cash_in(Decimal::ZERO, "x"), Err(RegisterError::InvalidAmount));
        assert_eq!(reg.cash_out(dec("-10"), "x"), Err(RegisterError::InvalidAmount));
        assert_eq!(
            RegisterError::InvalidAmount.to_string(),
            "amount must be greater than zero"
        );
        assert!(reg.movements().is_empty());
    }

    #[test]
    fn test_cash_out_cannot_exceed_drawer() {
        let mut reg = register();
        assert_eq!(
            reg.cash_out(dec("500.01"), "Too much"),
            Err(RegisterError::InsufficientCash {
                requested: dec("500.01"),
                available: dec("500.00"),
            })
        );
        assert!(reg.cash_out(dec("500"), "Bank deposit").is_ok());
        assert_eq!(reg.expected_cash(), Decimal::ZERO);
    }

    #[test]
    fn test_reason_required() {
        let mut reg = register();
        assert!(matches!(
            reg.cash_in(dec("10"), "  "),
            Err(RegisterError::Invalid(_))
        ));
    }

    #[test]
    fn test_sales_by_method() {
        let mut reg = register();
        reg.record_sale(PaymentMethod::Card, dec("10")).unwrap();
        reg.record_sale(PaymentMethod::Cash, dec("5")).unwrap();
        reg.record_sale(PaymentMethod::Card, dec("2.50")).unwrap();

        let breakdown = reg.sales_by_method();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].method, PaymentMethod::Cash);
        assert_eq!(breakdown[1].method, PaymentMethod::Card);
        assert_eq!(breakdown[1].amount, dec("12.50"));
        assert_eq!(breakdown[1].count, 2);
    }

    #[test]
    fn test_partial_cut_keeps_register_open() {
        let mut reg = register();
        reg.record_sale(PaymentMethod::Cash, dec("100")).unwrap();

        let report = reg
            .cut(CutKind::Partial, count_of("100", 6), false, &OrderBook::new())
            .unwrap();
        assert_eq!(report.result.expected_cash, Some(dec("600.00")));
        assert_eq!(report.result.difference, Some(Decimal::ZERO));
        assert!(reg.is_open());
        assert_eq!(reg.cuts().len(), 1);
    }

    #[test]
    fn test_final_cut_closes_register() {
        let mut reg = register();
        let report = reg
            .cut(CutKind::Final, count_of("200", 2), true, &OrderBook::new())
            .unwrap();
        assert!(report.result.is_blind_cut);
        assert_eq!(report.result.difference, None);
        assert_eq!(reg.status(), RegisterStatus::Closed);

        assert_eq!(
            reg.record_sale(PaymentMethod::Cash, dec("1")),
            Err(RegisterError::Closed)
        );
        assert_eq!(reg.cash_in(dec("1"), "late"), Err(RegisterError::Closed));
        assert!(
            reg.cut(CutKind::Partial, CashCount::default(), false, &OrderBook::new())
                .is_err()
        );
    }

    #[test]
    fn test_cut_counts_orders() {
        let mut reg = register();
        let mut book = OrderBook::new();
        let cart = || {
            Cart::new()
                .with_item(&MenuItemRef::new(1, "Agua fresca", dec("3")), 1, None)
                .unwrap()
        };
        let paid = book.place_order(OrderSource::Counter, None, cart()).unwrap();
        book.place_order(OrderSource::Counter, None, cart()).unwrap();
        book.mark_paid(paid, PaymentMethod::Cash, now_millis()).unwrap();
        reg.record_sale(PaymentMethod::Cash, dec("3")).unwrap();

        let report = reg
            .cut(CutKind::Partial, count_of("1", 503), false, &book)
            .unwrap();
        assert_eq!(report.orders_closed, 1);
        assert_eq!(report.orders_open, 1);
        assert_eq!(report.total_sales, dec("3"));
        assert_eq!(report.result.difference, Some(Decimal::ZERO));
    }

    #[test]
    fn test_negative_float_rejected() {
        assert!(CashRegister::open(dec("-1")).is_err());
        assert!(CashRegister::open(Decimal::ZERO).is_ok());
    }
}

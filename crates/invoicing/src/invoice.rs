use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{Aggregate, AggregateRoot, DomainError, ExpectedVersion, InvoiceId};

/// Aggregate root: Invoice.
///
/// Starts as a draft. Confirming assigns a number, fills in missing dates and
/// locks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    id: InvoiceId,
    number: Option<String>,
    customer: String,
    email: Option<String>,
    invoice_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    locked: bool,
    changed_at: DateTime<Utc>,
    version: u64,
}

impl Invoice {
    pub fn draft(
        id: InvoiceId,
        customer: impl Into<String>,
        email: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            number: None,
            customer: customer.into(),
            email,
            invoice_date: None,
            due_date: None,
            locked: false,
            changed_at: created_at,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn invoice_date(&self) -> Option<NaiveDate> {
        self.invoice_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    pub fn state_label(&self) -> &'static str {
        if self.locked { "Confirmed invoice" } else { "Draft invoice" }
    }

    /// Everything `handle` would reject, without deciding anything.
    ///
    /// Lets callers bail out before drawing an invoice number.
    pub fn check_save(&self, cmd: &SaveInvoice) -> Result<(), DomainError> {
        if cmd.invoice_id != self.id {
            return Err(DomainError::invariant("invoice_id mismatch"));
        }
        if self.locked && !cmd.may_edit_locked {
            return Err(DomainError::conflict(
                "This invoice is confirmed and can no longer be modified.",
            ));
        }
        cmd.expected_version.check(self.version)?;

        if let Some(customer) = &cmd.edits.customer {
            if customer.trim().is_empty() {
                return Err(DomainError::validation("customer cannot be empty"));
            }
        }
        if let Some(Some(email)) = &cmd.edits.email {
            if !email.contains('@') {
                return Err(DomainError::validation("contact email is not valid"));
            }
        }

        let invoice_date = cmd.edits.invoice_date.unwrap_or(self.invoice_date);
        let due_date = cmd.edits.due_date.unwrap_or(self.due_date);
        if let (Some(issued), Some(due)) = (invoice_date, due_date) {
            if due < issued {
                return Err(DomainError::validation("due date cannot precede invoice date"));
            }
        }
        Ok(())
    }
}

impl AggregateRoot for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Field changes submitted with a save. `None` leaves a field as is;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceEdits {
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub email: Option<Option<String>>,
    #[serde(default)]
    pub invoice_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Inputs needed to confirm, resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub number: String,
    pub today: NaiveDate,
    pub due_days: u32,
}

/// Command: SaveInvoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveInvoice {
    pub invoice_id: InvoiceId,
    pub edits: InvoiceEdits,
    pub confirm: Option<Confirmation>,
    pub expected_version: ExpectedVersion,
    pub may_edit_locked: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceCommand {
    Save(SaveInvoice),
}

/// Event: InvoiceEdited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceEdited {
    pub invoice_id: InvoiceId,
    pub edits: InvoiceEdits,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvoiceConfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceConfirmed {
    pub invoice_id: InvoiceId,
    pub number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceEvent {
    Edited(InvoiceEdited),
    Confirmed(InvoiceConfirmed),
}

impl Aggregate for Invoice {
    type Command = InvoiceCommand;
    type Event = InvoiceEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InvoiceEvent::Edited(e) => {
                if let Some(customer) = &e.edits.customer {
                    self.customer = customer.trim().to_string();
                }
                if let Some(email) = &e.edits.email {
                    self.email = email.clone();
                }
                if let Some(date) = e.edits.invoice_date {
                    self.invoice_date = date;
                }
                if let Some(date) = e.edits.due_date {
                    self.due_date = date;
                }
                self.changed_at = e.occurred_at;
            }
            InvoiceEvent::Confirmed(e) => {
                self.number = Some(e.number.clone());
                self.invoice_date = Some(e.invoice_date);
                self.due_date = Some(e.due_date);
                self.locked = true;
                self.changed_at = e.occurred_at;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InvoiceCommand::Save(cmd) => self.handle_save(cmd),
        }
    }
}

impl Invoice {
    fn handle_save(&self, cmd: &SaveInvoice) -> Result<Vec<InvoiceEvent>, DomainError> {
        self.check_save(cmd)?;

        let mut events = vec![InvoiceEvent::Edited(InvoiceEdited {
            invoice_id: self.id,
            edits: cmd.edits.clone(),
            occurred_at: cmd.occurred_at,
        })];

        if let (Some(confirmation), false) = (&cmd.confirm, self.locked) {
            let invoice_date = cmd
                .edits
                .invoice_date
                .unwrap_or(self.invoice_date)
                .unwrap_or(confirmation.today);
            let due_date = match cmd.edits.due_date.unwrap_or(self.due_date) {
                Some(date) => date,
                None => invoice_date
                    .checked_add_days(Days::new(u64::from(confirmation.due_days)))
                    .ok_or_else(|| DomainError::validation("due date out of range"))?,
            };

            events.push(InvoiceEvent::Confirmed(InvoiceConfirmed {
                invoice_id: self.id,
                number: confirmation.number.clone(),
                invoice_date,
                due_date,
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }
}

/// Read-only projection handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceView {
    pub id: InvoiceId,
    pub number: Option<String>,
    pub customer: String,
    pub email: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub state: &'static str,
    pub locked: bool,
    /// Whether the viewer may still save changes.
    pub editable: bool,
    pub version: u64,
    pub changed_at: DateTime<Utc>,
}

impl InvoiceView {
    pub fn new(invoice: &Invoice, may_edit_locked: bool) -> Self {
        Self {
            id: invoice.id,
            number: invoice.number.clone(),
            customer: invoice.customer.clone(),
            email: invoice.email.clone(),
            invoice_date: invoice.invoice_date,
            due_date: invoice.due_date,
            state: invoice.state_label(),
            locked: invoice.locked,
            editable: !invoice.locked || may_edit_locked,
            version: invoice.version,
            changed_at: invoice.changed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> Invoice {
        Invoice::draft(InvoiceId::new(1), "ACME Corp", Some("billing@acme.test".into()), Utc::now())
    }

    fn save(invoice: &Invoice, edits: InvoiceEdits, confirm: Option<Confirmation>) -> SaveInvoice {
        SaveInvoice {
            invoice_id: invoice.id_typed(),
            edits,
            confirm,
            expected_version: ExpectedVersion::Any,
            may_edit_locked: false,
            occurred_at: Utc::now(),
        }
    }

    fn confirmation(number: &str) -> Confirmation {
        Confirmation {
            number: number.into(),
            today: date(2026, 3, 10),
            due_days: 30,
        }
    }

    #[test]
    fn plain_save_edits_draft() {
        let mut invoice = draft();
        let edits = InvoiceEdits {
            customer: Some("  ACME Inc ".into()),
            email: Some(None),
            ..Default::default()
        };

        let events = invoice.execute(&InvoiceCommand::Save(save(&invoice, edits, None))).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(invoice.customer(), "ACME Inc");
        assert_eq!(invoice.email(), None);
        assert!(!invoice.is_locked());
        assert_eq!(invoice.version(), 1);
        assert_eq!(invoice.state_label(), "Draft invoice");
    }

    #[test]
    fn confirm_fills_dates_numbers_and_locks() {
        let mut invoice = draft();
        let cmd = save(&invoice, InvoiceEdits::default(), Some(confirmation("2026-00001")));

        invoice.execute(&InvoiceCommand::Save(cmd)).unwrap();

        assert!(invoice.is_locked());
        assert_eq!(invoice.number(), Some("2026-00001"));
        assert_eq!(invoice.invoice_date(), Some(date(2026, 3, 10)));
        assert_eq!(invoice.due_date(), Some(date(2026, 4, 9)));
        assert_eq!(invoice.state_label(), "Confirmed invoice");
    }

    #[test]
    fn confirm_keeps_dates_already_set() {
        let mut invoice = draft();
        let edits = InvoiceEdits {
            invoice_date: Some(Some(date(2026, 1, 1))),
            ..Default::default()
        };

        invoice
            .execute(&InvoiceCommand::Save(save(&invoice, edits, Some(confirmation("N-1")))))
            .unwrap();

        assert_eq!(invoice.invoice_date(), Some(date(2026, 1, 1)));
        assert_eq!(invoice.due_date(), Some(date(2026, 1, 31)));
    }

    #[test]
    fn locked_invoice_rejects_edits_without_permission() {
        let mut invoice = draft();
        invoice
            .execute(&InvoiceCommand::Save(save(&invoice, InvoiceEdits::default(), Some(confirmation("N-1")))))
            .unwrap();

        let cmd = save(&invoice, InvoiceEdits::default(), None);
        assert!(matches!(invoice.handle(&InvoiceCommand::Save(cmd.clone())), Err(DomainError::Conflict(_))));

        let privileged = SaveInvoice { may_edit_locked: true, ..cmd };
        assert!(invoice.handle(&InvoiceCommand::Save(privileged)).is_ok());
    }

    #[test]
    fn reconfirming_locked_invoice_does_not_renumber() {
        let mut invoice = draft();
        invoice
            .execute(&InvoiceCommand::Save(save(&invoice, InvoiceEdits::default(), Some(confirmation("N-1")))))
            .unwrap();

        let mut cmd = save(&invoice, InvoiceEdits::default(), Some(confirmation("N-2")));
        cmd.may_edit_locked = true;
        let events = invoice.execute(&InvoiceCommand::Save(cmd)).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(invoice.number(), Some("N-1"));
    }

    #[test]
    fn stale_version_is_a_conflict() {
        let mut invoice = draft();
        invoice
            .execute(&InvoiceCommand::Save(save(&invoice, InvoiceEdits::default(), None)))
            .unwrap();

        let mut cmd = save(&invoice, InvoiceEdits::default(), None);
        cmd.expected_version = ExpectedVersion::Exact(0);
        assert!(matches!(invoice.handle(&InvoiceCommand::Save(cmd)), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn validation_rules() {
        let invoice = draft();

        let blank = InvoiceEdits { customer: Some("  ".into()), ..Default::default() };
        assert!(matches!(invoice.check_save(&save(&invoice, blank, None)), Err(DomainError::Validation(_))));

        let bad_email = InvoiceEdits { email: Some(Some("nope".into())), ..Default::default() };
        assert!(invoice.check_save(&save(&invoice, bad_email, None)).is_err());

        let backwards = InvoiceEdits {
            invoice_date: Some(Some(date(2026, 5, 1))),
            due_date: Some(Some(date(2026, 4, 1))),
            ..Default::default()
        };
        assert!(invoice.check_save(&save(&invoice, backwards, None)).is_err());
    }

    #[test]
    fn view_reports_editability() {
        let mut invoice = draft();
        assert!(InvoiceView::new(&invoice, false).editable);

        invoice
            .execute(&InvoiceCommand::Save(save(&invoice, InvoiceEdits::default(), Some(confirmation("N-1")))))
            .unwrap();
        assert!(!InvoiceView::new(&invoice, false).editable);
        assert!(InvoiceView::new(&invoice, true).editable);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: confirming always yields due_date = invoice_date + due_days.
            #[test]
            fn due_date_offset(days_from_epoch in 0u64..20_000, due_days in 0u32..365) {
                let today = date(2000, 1, 1).checked_add_days(Days::new(days_from_epoch)).unwrap();
                let mut invoice = draft();
                let cmd = save(
                    &invoice,
                    InvoiceEdits::default(),
                    Some(Confirmation { number: "N".into(), today, due_days }),
                );

                invoice.execute(&InvoiceCommand::Save(cmd)).unwrap();

                prop_assert_eq!(invoice.invoice_date(), Some(today));
                prop_assert_eq!(
                    invoice.due_date(),
                    today.checked_add_days(Days::new(u64::from(due_days)))
                );
            }
        }
    }
}

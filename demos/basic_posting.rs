//! Basic voucher posting example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use erp_ledger_core::{
    AccountGroup, AccountType, LedgerAccount, MemoryStorage, PostingEngine, VoucherBody,
    VoucherDraft, VoucherItem,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 ERP Ledger Core - Basic Posting Example\n");

    let storage = MemoryStorage::new();
    let mut engine = PostingEngine::new(storage);
    let company = "acme";

    // 1. Set up a small chart of accounts
    println!("📊 Setting up Chart of Accounts...");
    for (id, name, parent, account_type) in [
        ("assets", "Assets", None, Some(AccountType::Asset)),
        ("current_assets", "Current Assets", Some("assets"), None),
        ("expenses", "Expenses", None, Some(AccountType::Expense)),
        ("income", "Income", None, Some(AccountType::Income)),
    ] {
        engine
            .create_group(AccountGroup::new(
                id.to_string(),
                company.to_string(),
                name.to_string(),
                parent.map(|p: &str| p.to_string()),
                account_type,
            ))
            .await?;
    }

    for (id, name, group, opening) in [
        ("cash", "Cash", "current_assets", 1000),
        ("bank", "Bank", "current_assets", 0),
        ("rent", "Rent Expense", "expenses", 0),
        ("sales", "Sales Income", "income", 0),
    ] {
        engine
            .create_ledger(LedgerAccount::new(
                id.to_string(),
                company.to_string(),
                name.to_string(),
                group.to_string(),
                BigDecimal::from(opening),
            ))
            .await?;
    }

    for flat in engine.chart_of_ledgers(company).await? {
        println!(
            "  ✓ {} - {} ({:?}, under {})",
            flat.ledger.id, flat.ledger.name, flat.account_type, flat.group_name
        );
    }
    println!();

    // 2. Post some vouchers
    println!("💰 Posting Vouchers...\n");

    let sale = engine
        .create_voucher(VoucherDraft {
            company_id: company.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            manual_receipt_no: Some("RB-001".to_string()),
            main_narration: Some("Cash sale".to_string()),
            body: VoucherBody::Income {
                received_into: "cash".to_string(),
                items: vec![VoucherItem::new(
                    "sales".to_string(),
                    BigDecimal::from(500),
                    None,
                )],
            },
        })
        .await?;
    println!("  ✓ Posted {} for {}", sale.voucher_number, sale.total_amount);

    let rent = engine
        .create_voucher(VoucherDraft {
            company_id: company.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            manual_receipt_no: None,
            main_narration: Some("January rent".to_string()),
            body: VoucherBody::Expense {
                paid_from: "cash".to_string(),
                items: vec![VoucherItem::new(
                    "rent".to_string(),
                    BigDecimal::from(200),
                    None,
                )],
            },
        })
        .await?;
    println!("  ✓ Posted {} for {}", rent.voucher_number, rent.total_amount);

    let transfer = engine
        .create_voucher(VoucherDraft {
            company_id: company.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            manual_receipt_no: None,
            main_narration: Some("Bank deposit".to_string()),
            body: VoucherBody::Transfer {
                from_account: "cash".to_string(),
                to_account: "bank".to_string(),
                amount: BigDecimal::from(800),
            },
        })
        .await?;
    println!(
        "  ✓ Posted {} for {}\n",
        transfer.voucher_number, transfer.total_amount
    );

    // 3. Print the cash statement
    println!("📜 Cash Statement:");
    let stmt = engine.ledger_statement(company, "cash", None, None).await?;
    for row in &stmt.rows {
        println!(
            "  {:<12} {:<22} {:>8} {:>8}  balance {}",
            row.date.map(|d| d.to_string()).unwrap_or_default(),
            row.party,
            row.debit,
            row.credit,
            erp_ledger_core::display_balance(&row.balance)
        );
    }
    println!("\n  Closing balance: {}", stmt.closing_display());

    Ok(())
}

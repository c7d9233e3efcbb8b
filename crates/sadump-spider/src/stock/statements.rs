use super::common::{from_records, parse_date};
use crate::error::Result;
use crate::nodes::Payload;
use crate::schema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The four financial statement pages; all are decoded through [`schema::FINANCIALS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Statement {
    Income,
    Balance,
    CashFlow,
    Ratios,
}

impl Statement {
    /// Path segment under `/stocks/{symbol}/financials`.
    pub(crate) fn segment(&self) -> &'static str {
        match self {
            Statement::Income => "",
            Statement::Balance => "/balance-sheet",
            Statement::CashFlow => "/cash-flow-statement",
            Statement::Ratios => "/ratios",
        }
    }
}

/// Decode every period of a financial statement page into `T`.
pub fn decode<T: DeserializeOwned>(payload: &Payload) -> Result<Vec<T>> {
    let records = schema::FINANCIALS.decode(&payload.table())?.records()?;
    from_records(records)
}

/// The reporting period shared by every statement row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FiscalPeriod {
    pub datekey: String,
    pub fiscal_year: String,
    pub fiscal_quarter: String,
}

impl FiscalPeriod {
    /// Period end date; `None` for trailing-twelve-month columns.
    pub fn dated(&self) -> Option<chrono::NaiveDate> {
        parse_date(&self.datekey)
    }
}

// balance sheet
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BalanceSheet {
    #[serde(flatten)]
    pub period: FiscalPeriod,
    pub cashneq: Option<f64>,
    pub investmentsc: Option<f64>,
    pub totalcash: Option<f64>,
    pub cash_growth: Option<f64>,
    pub accounts_receivable: Option<f64>,
    pub other_receivables: Option<f64>,
    pub receivables: Option<f64>,
    pub inventory: Option<f64>,
    pub restricted_cash: Option<f64>,
    pub othercurrent: Option<f64>,
    pub assetsc: Option<f64>,
    #[serde(rename = "netPPE")]
    pub net_ppe: Option<f64>,
    pub investmentsnc: Option<f64>,
    pub goodwill: Option<f64>,
    pub other_intangibles: Option<f64>,
    pub othernoncurrent: Option<f64>,
    pub assets: Option<f64>,
    pub accounts_payable: Option<f64>,
    pub accrued_expenses: Option<f64>,
    pub debtc: Option<f64>,
    pub current_port_debt: Option<f64>,
    pub current_cap_leases: Option<f64>,
    pub current_income_taxes_payable: Option<f64>,
    pub current_unearned_revenue: Option<f64>,
    pub other_current_liabilities: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub debtnc: Option<f64>,
    pub capital_leases: Option<f64>,
    pub long_term_unearned_revenue: Option<f64>,
    pub long_term_deferred_tax_liabilities: Option<f64>,
    pub otherliabilitiesnoncurrent: Option<f64>,
    pub liabilities: Option<f64>,
    pub common_stock: Option<f64>,
    pub retearn: Option<f64>,
    pub other_equity: Option<f64>,
    pub equity: Option<f64>,
    pub liabilitiesequity: Option<f64>,
    pub shares_out_filing_date: Option<f64>,
    pub shares_out_total_common: Option<f64>,
    pub bvps: Option<f64>,
    pub tangible_book_value: Option<f64>,
    pub tangible_book_value_per_share: Option<f64>,
    pub debt: Option<f64>,
    pub netcash: Option<f64>,
    pub net_cash_growth: Option<f64>,
    pub netcashpershare: Option<f64>,
    pub workingcapital: Option<f64>,
    pub land: Option<f64>,
    pub machinery: Option<f64>,
    pub leasehold_improvements: Option<f64>,
    pub trading_asset_securities: Option<f64>,
}

// income statement
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomeStatement {
    #[serde(flatten)]
    pub period: FiscalPeriod,
    pub revenue: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub cor: Option<f64>,
    pub gp: Option<f64>,
    pub sgna: Option<f64>,
    pub rnd: Option<f64>,
    pub opex: Option<f64>,
    pub opinc: Option<f64>,
    pub interest_expense: Option<f64>,
    pub interest_income: Option<f64>,
    pub currency_gains: Option<f64>,
    pub other_non_operating: Option<f64>,
    pub ebt_excl: Option<f64>,
    pub gain_investments: Option<f64>,
    pub pretax: Option<f64>,
    pub taxexp: Option<f64>,
    pub netinc: Option<f64>,
    pub netinccmn: Option<f64>,
    pub net_income_growth: Option<f64>,
    pub shares_basic: Option<f64>,
    pub shares_diluted: Option<f64>,
    #[serde(rename = "sharesYoY")]
    pub shares_yoy: Option<f64>,
    pub eps_basic: Option<f64>,
    pub eps_dil: Option<f64>,
    pub eps_growth: Option<f64>,
    pub fcf: Option<f64>,
    pub fcfps: Option<f64>,
    pub dps: Option<f64>,
    pub dividend_growth: Option<f64>,
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub profit_margin: Option<f64>,
    pub fcf_margin: Option<f64>,
    pub taxrate: Option<f64>,
    pub ebitda: Option<f64>,
    pub dep_amor_ebitda: Option<f64>,
    pub ebitda_margin: Option<f64>,
    pub ebit: Option<f64>,
    pub ebit_margin: Option<f64>,
    pub revenue_as_reported: Option<f64>,
    pub payout_ratio: Option<f64>,
}

// cash flow
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CashFlow {
    #[serde(flatten)]
    pub period: FiscalPeriod,
    #[serde(rename = "netIncomeCF")]
    pub net_income: Option<f64>,
    #[serde(rename = "totalDepAmorCF")]
    pub total_dep_amor: Option<f64>,
    pub sbcomp: Option<f64>,
    #[serde(rename = "changeAR")]
    pub change_ar: Option<f64>,
    pub change_inventory: Option<f64>,
    #[serde(rename = "changeAP")]
    pub change_ap: Option<f64>,
    pub change_unearned_rev: Option<f64>,
    pub change_other_net_oper_assets: Option<f64>,
    pub otheroperating: Option<f64>,
    pub ncfo: Option<f64>,
    pub ocf_growth: Option<f64>,
    pub capex: Option<f64>,
    pub cash_acquisition: Option<f64>,
    pub sale_purchase_intangibles: Option<f64>,
    pub invest_in_securities: Option<f64>,
    pub otherinvesting: Option<f64>,
    pub ncfi: Option<f64>,
    pub debt_issued_short_term: Option<f64>,
    pub debt_issued_long_term: Option<f64>,
    pub debt_issued_total: Option<f64>,
    pub debt_repaid_short_term: Option<f64>,
    pub debt_repaid_long_term: Option<f64>,
    pub debt_repaid_total: Option<f64>,
    pub net_debt_issued: Option<f64>,
    pub common_issued: Option<f64>,
    pub common_repurchased: Option<f64>,
    #[serde(rename = "commonDividendCF")]
    pub common_dividend: Option<f64>,
    pub otherfinancing: Option<f64>,
    pub ncff: Option<f64>,
    pub ncf: Option<f64>,
    pub fcf: Option<f64>,
    pub fcf_growth: Option<f64>,
    pub fcf_margin: Option<f64>,
    pub fcfps: Option<f64>,
    #[serde(rename = "leveredFCF")]
    pub levered_fcf: Option<f64>,
    #[serde(rename = "unleveredFCF")]
    pub unlevered_fcf: Option<f64>,
    pub cash_interest_paid: Option<f64>,
    pub cash_taxes_paid: Option<f64>,
    pub change_net_working_capital: Option<f64>,
}

// ratios
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialRatios {
    #[serde(flatten)]
    pub period: FiscalPeriod,
    pub marketcap: Option<f64>,
    pub market_cap_growth: Option<f64>,
    pub ev: Option<f64>,
    pub last_close_ratios: Option<f64>,
    pub pe: Option<f64>,
    pub ps: Option<f64>,
    pub pb: Option<f64>,
    pub pfcf: Option<f64>,
    pub pocf: Option<f64>,
    pub ev_revenue: Option<f64>,
    pub ev_ebitda: Option<f64>,
    pub ev_ebit: Option<f64>,
    pub ev_fcf: Option<f64>,
    pub debt_equity: Option<f64>,
    pub debt_ebitda: Option<f64>,
    pub debt_fcf: Option<f64>,
    pub asset_turnover: Option<f64>,
    pub inventory_turnover: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub current_ratio: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub roic: Option<f64>,
    pub earnings_yield: Option<f64>,
    pub fcf_yield: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub buyback_yield: Option<f64>,
    pub total_return: Option<f64>,
}

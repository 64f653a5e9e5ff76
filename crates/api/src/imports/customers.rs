use scylla_core::error::CoreError;
use scylla_core::import::{ImportSchema, RuleTable};
use scylla_core::sheet::Row;
use scylla_db::models::customer::CreateCustomer;

/// Sheet layout: `username | email | phone | address`.
const RULES: &[(usize, &str)] = &[
    (0, "username,required"),
    (1, "email,required,unique"),
    (2, "phone,required"),
    (3, "address,required"),
];

#[derive(Debug)]
pub struct CustomerSheet {
    rules: RuleTable,
}

impl CustomerSheet {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            rules: RuleTable::from_specs(RULES)?,
        })
    }
}

impl ImportSchema for CustomerSheet {
    type Record = CreateCustomer;

    fn table(&self) -> &'static str {
        "customers"
    }

    fn rules(&self) -> &RuleTable {
        &self.rules
    }

    fn materialize(&self, row: &Row) -> Result<CreateCustomer, String> {
        Ok(CreateCustomer {
            username: row.cell(0).to_string(),
            email: row.cell(1).to_string(),
            phone: row.cell(2).to_string(),
            address: row.cell(3).to_string(),
        })
    }
}

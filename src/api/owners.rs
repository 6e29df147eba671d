use super::client::ApiClient;
use crate::error::Result;
use titweng_common::{Owner, OwnerList};

impl ApiClient {
    pub async fn list_owners(&self) -> Result<Vec<Owner>> {
        let list: OwnerList = self.get_json("/admin/owners").await?;
        Ok(list.owners)
    }
}

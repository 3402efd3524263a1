mod common;
mod goods_receipts;

pub use common::{DirectoryOptionResponse, HealthResponse, UserIdentityResponse};
pub use goods_receipts::{
    GoodsReceiptResponse, RelatedOrganizationResponse, RelatedUserResponse,
};

use crate::domain::models::DomainBaby;
use shared::{Baby, BabyListResponse, BabyResponse};

/// Mapper from domain babies to shared Baby DTOs
pub struct BabyMapper;

impl BabyMapper {
    pub fn to_dto(domain: DomainBaby) -> Baby {
        Baby {
            id: domain.id,
            name: domain.name,
            birthdate: domain.birthdate,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_response(domain: DomainBaby, success_message: &str) -> BabyResponse {
        BabyResponse {
            baby: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_list_response(babies: Vec<DomainBaby>) -> BabyListResponse {
        BabyListResponse {
            babies: babies.into_iter().map(Self::to_dto).collect(),
        }
    }
}

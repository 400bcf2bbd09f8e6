use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub price: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cart_products::Entity")]
    CartProducts,
    #[sea_orm(has_many = "super::buy_history_products::Entity")]
    BuyHistoryProducts,
    #[sea_orm(has_many = "super::comments::Entity")]
    Comments,
}

impl Related<super::cart_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartProducts.def()
    }
}

impl Related<super::buy_history_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BuyHistoryProducts.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "buy_history_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub buy_history_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::buy_histories::Entity",
        from = "Column::BuyHistoryId",
        to = "super::buy_histories::Column::Id",
        on_delete = "Cascade"
    )]
    BuyHistories,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Restrict"
    )]
    Products,
}

impl Related<super::buy_histories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BuyHistories.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

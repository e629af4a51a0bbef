use crate::schema::todos;
use diesel::prelude::*;

#[derive(Queryable, Debug, PartialEq, Eq)]
pub struct Todo {
    pub id: i32,
    pub user_id: i32,
    pub task: String,
}

#[derive(Insertable)]
#[diesel(table_name = todos)]
pub struct NewTodo<'a> {
    pub user_id: i32,
    pub task: &'a str,
}

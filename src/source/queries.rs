//! Fixed projections requested by each view. The store's query language is
//! opaque to the dashboard; these strings are passed through unchanged.

pub const PRODUCTS: &str = r#"*[_type == "myproduct"]{
  "_id": _id,
  name,
  "categoryName": category->name,
  price,
  stock,
  rating,
  "imageUrl": image.asset->url
}"#;

pub const ORDERS: &str = r#"*[_type == "order"]{
  _id,
  customer->{
    fullName
  },
  totalAmount,
  status,
  orderDate,
  orderId,
  items,
  shippingAddress,
}"#;

pub const CUSTOMERS: &str = r#"*[_type == "customer"]{
  _id,
  fullName,
  email,
  phoneNumber,
  address,
  city
}"#;

pub const OVERVIEW_PRODUCTS: &str = r#"*[_type == "myproduct"]{
  price,
  stock,
}"#;

pub const OVERVIEW_ORDERS: &str = r#"*[_type == "order"]{
  status
}"#;
